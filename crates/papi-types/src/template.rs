//! TOSCA transit structures
//!
//! The service template is the wire-level container for policy types and
//! policies. The daemon treats the TOSCA bodies as opaque; only enough
//! structure is modelled here to address entries by name and version and to
//! ask whether a template carries any payload at all.

use crate::key::ConceptKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A TOSCA policy type entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToscaPolicyType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
    /// Unrecognized TOSCA body keys, preserved verbatim
    #[serde(flatten)]
    pub extras: serde_json::Map<String, serde_json::Value>,
}

/// A TOSCA policy entry, bound to exactly one policy type version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToscaPolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub policy_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extras: serde_json::Map<String, serde_json::Value>,
}

impl ToscaPolicy {
    /// The `name:version` key of this policy, if both parts are present
    pub fn key(&self) -> Option<ConceptKey> {
        match (&self.name, &self.version) {
            (Some(name), Some(version)) => Some(ConceptKey::new(name, version)),
            _ => None,
        }
    }
}

/// Topology template section holding policies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToscaTopologyTemplate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policies: Option<Vec<BTreeMap<String, ToscaPolicy>>>,
}

/// The wire container for policy types and/or policies
///
/// TOSCA renders both sections as lists of single-entry maps keyed by
/// concept name; that shape is kept here so stored templates round-trip
/// byte-for-byte.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToscaServiceTemplate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tosca_definitions_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_types: Option<Vec<BTreeMap<String, ToscaPolicyType>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topology_template: Option<ToscaTopologyTemplate>,
}

impl ToscaServiceTemplate {
    /// Template carrying only policy types
    pub fn with_policy_types(entries: Vec<BTreeMap<String, ToscaPolicyType>>) -> Self {
        Self {
            tosca_definitions_version: Some(Self::DEFINITIONS_VERSION.to_string()),
            policy_types: Some(entries),
            topology_template: None,
        }
    }

    /// Template carrying only policies
    pub fn with_policies(entries: Vec<BTreeMap<String, ToscaPolicy>>) -> Self {
        Self {
            tosca_definitions_version: Some(Self::DEFINITIONS_VERSION.to_string()),
            policy_types: None,
            topology_template: Some(ToscaTopologyTemplate {
                policies: Some(entries),
            }),
        }
    }

    pub const DEFINITIONS_VERSION: &'static str = "tosca_simple_yaml_1_0_0";

    /// Whether the template contains at least one policy type
    pub fn has_policy_types(&self) -> bool {
        has_entries(&self.policy_types)
    }

    /// Whether the template contains at least one policy
    pub fn has_policies(&self) -> bool {
        match &self.topology_template {
            Some(topology) => has_entries(&topology.policies),
            None => false,
        }
    }

    /// Iterate over policy type entries as `(name, record)` pairs
    pub fn policy_types_iter(&self) -> impl Iterator<Item = (&String, &ToscaPolicyType)> {
        self.policy_types.iter().flatten().flatten()
    }

    /// Iterate over policy entries as `(name, record)` pairs
    pub fn policies_iter(&self) -> impl Iterator<Item = (&String, &ToscaPolicy)> {
        self.topology_template
            .iter()
            .flat_map(|t| t.policies.iter().flatten().flatten())
    }
}

// The original wire format allows a present-but-empty list; only a non-empty
// first entry counts as data.
fn has_entries<T>(list: &Option<Vec<BTreeMap<String, T>>>) -> bool {
    list.as_ref()
        .and_then(|entries| entries.first())
        .map(|entry| !entry.is_empty())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy_entry(name: &str, version: &str) -> BTreeMap<String, ToscaPolicy> {
        let mut entry = BTreeMap::new();
        entry.insert(
            name.to_string(),
            ToscaPolicy {
                name: Some(name.to_string()),
                version: Some(version.to_string()),
                policy_type: Some("onap.policies.Test".to_string()),
                type_version: Some("1.0.0".to_string()),
                ..Default::default()
            },
        );
        entry
    }

    #[test]
    fn empty_template_has_no_payload() {
        let template = ToscaServiceTemplate::default();
        assert!(!template.has_policy_types());
        assert!(!template.has_policies());
    }

    #[test]
    fn present_but_empty_lists_do_not_count_as_payload() {
        let template = ToscaServiceTemplate {
            policy_types: Some(vec![BTreeMap::new()]),
            topology_template: Some(ToscaTopologyTemplate {
                policies: Some(vec![]),
            }),
            ..Default::default()
        };
        assert!(!template.has_policy_types());
        assert!(!template.has_policies());
    }

    #[test]
    fn policy_entries_are_iterable() {
        let template = ToscaServiceTemplate::with_policies(vec![
            policy_entry("p", "1.0.0"),
            policy_entry("p", "2.0.0"),
        ]);
        assert!(template.has_policies());
        let keys: Vec<_> = template
            .policies_iter()
            .filter_map(|(_, p)| p.key())
            .collect();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0], ConceptKey::new("p", "1.0.0"));
    }

    #[test]
    fn unknown_body_keys_round_trip() {
        let raw = serde_json::json!({
            "policy_types": [{
                "onap.policies.Test": {
                    "version": "1.0.0",
                    "trigger": {"kind": "event"}
                }
            }]
        });
        let template: ToscaServiceTemplate = serde_json::from_value(raw.clone()).unwrap();
        assert!(template.has_policy_types());
        let back = serde_json::to_value(&template).unwrap();
        assert_eq!(
            back["policy_types"][0]["onap.policies.Test"]["trigger"]["kind"],
            "event"
        );
    }
}
