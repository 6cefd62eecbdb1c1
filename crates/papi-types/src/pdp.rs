//! PDP group records and filters
//!
//! PDP groups are owned by an external system. The daemon only reads them,
//! to find out where a policy is deployed before allowing a delete.

use crate::key::{ConceptKey, ToscaPolicyIdentifier};
use serde::{Deserialize, Serialize};

/// A deployment target group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdpGroup {
    pub name: String,
    pub version: String,
    /// Policies currently deployed in this group
    #[serde(default)]
    pub policies: Vec<ConceptKey>,
    /// Policy types this group can host
    #[serde(default)]
    pub supported_policy_types: Vec<ConceptKey>,
}

impl PdpGroup {
    /// The `name:version` key of this group
    pub fn key(&self) -> ConceptKey {
        ConceptKey::new(&self.name, &self.version)
    }

    /// Versions of the named policy deployed in this group
    pub fn deployed_versions_of(&self, policy_name: &str) -> Vec<String> {
        self.policies
            .iter()
            .filter(|key| key.name == policy_name)
            .map(|key| key.version.clone())
            .collect()
    }
}

/// Filter over the PDP group store
///
/// Each present criterion must be satisfied; within a criterion matching is
/// "any of".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdpGroupFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_type_list: Option<Vec<ToscaPolicyIdentifier>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_list: Option<Vec<ToscaPolicyIdentifier>>,
}

impl PdpGroupFilter {
    /// Filter on deployed policies
    pub fn for_policies(policies: Vec<ToscaPolicyIdentifier>) -> Self {
        Self {
            policy_type_list: None,
            policy_list: Some(policies),
        }
    }

    /// Filter on supported policy types
    pub fn for_policy_types(policy_types: Vec<ToscaPolicyIdentifier>) -> Self {
        Self {
            policy_type_list: Some(policy_types),
            policy_list: None,
        }
    }

    /// Whether a group passes this filter
    pub fn matches(&self, group: &PdpGroup) -> bool {
        let types_match = self.policy_type_list.as_ref().map_or(true, |wanted| {
            wanted
                .iter()
                .any(|id| group.supported_policy_types.iter().any(|key| id.matches(key)))
        });
        let policies_match = self.policy_list.as_ref().map_or(true, |wanted| {
            wanted
                .iter()
                .any(|id| group.policies.iter().any(|key| id.matches(key)))
        });
        types_match && policies_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> PdpGroup {
        PdpGroup {
            name: "defaultGroup".to_string(),
            version: "1".to_string(),
            policies: vec![
                ConceptKey::new("p", "1.0.0"),
                ConceptKey::new("p", "2.0.0"),
                ConceptKey::new("q", "1.0.0"),
            ],
            supported_policy_types: vec![ConceptKey::new(
                "onap.policies.controlloop.guard.MinMax",
                "1.0.0",
            )],
        }
    }

    #[test]
    fn policy_filter_matches_any_listed_identifier() {
        let filter =
            PdpGroupFilter::for_policies(vec![ToscaPolicyIdentifier::exact("p", "2.0.0")]);
        assert!(filter.matches(&group()));

        let miss =
            PdpGroupFilter::for_policies(vec![ToscaPolicyIdentifier::exact("p", "3.0.0")]);
        assert!(!miss.matches(&group()));
    }

    #[test]
    fn wildcard_policy_filter_matches_all_versions() {
        let filter = PdpGroupFilter::for_policies(vec![ToscaPolicyIdentifier::any_version("p")]);
        assert!(filter.matches(&group()));
    }

    #[test]
    fn type_filter_matches_supported_types() {
        let filter = PdpGroupFilter::for_policy_types(vec![ToscaPolicyIdentifier::exact(
            "onap.policies.controlloop.guard.MinMax",
            "1.0.0",
        )]);
        assert!(filter.matches(&group()));

        let miss = PdpGroupFilter::for_policy_types(vec![ToscaPolicyIdentifier::exact(
            "onap.policies.controlloop.guard.Blacklist",
            "1.0.0",
        )]);
        assert!(!miss.matches(&group()));
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(PdpGroupFilter::default().matches(&group()));
    }

    #[test]
    fn deployed_versions_are_collected_per_name() {
        let versions = group().deployed_versions_of("p");
        assert_eq!(versions, vec!["1.0.0".to_string(), "2.0.0".to_string()]);
        assert!(group().deployed_versions_of("missing").is_empty());
    }
}
