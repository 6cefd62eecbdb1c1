//! In-memory storage implementation

use super::traits::{PolicyStore, StoreResult};
use crate::error::StorageError;
use async_trait::async_trait;
use papi_types::{
    ConceptKey, GuardPolicyMap, LegacyGuardPolicyInput, LegacyGuardPolicyOutput, PdpGroup,
    PdpGroupFilter, ToscaPolicy, ToscaPolicyType, ToscaServiceTemplate,
};
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;

/// In-memory models store for development and testing
///
/// Keeps everything in `BTreeMap`s keyed by concept key so listings come
/// back in a stable order. PDP groups are held verbatim; an external system
/// owns their lifecycle and tests install them directly.
#[derive(Debug, Default)]
pub struct InMemoryPolicyStore {
    policy_types: RwLock<BTreeMap<ConceptKey, ToscaPolicyType>>,
    policies: RwLock<BTreeMap<ConceptKey, ToscaPolicy>>,
    guard_policies: RwLock<BTreeMap<(String, String), LegacyGuardPolicyOutput>>,
    pdp_groups: RwLock<Vec<PdpGroup>>,
    preloaded: HashSet<ConceptKey>,
}

impl InMemoryPolicyStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the given policy type keys marked system-supplied
    pub fn with_preloaded(preloaded: impl IntoIterator<Item = ConceptKey>) -> Self {
        Self {
            preloaded: preloaded.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Replace the PDP group view
    pub async fn set_pdp_groups(&self, groups: Vec<PdpGroup>) {
        *self.pdp_groups.write().await = groups;
    }

    fn type_entry(key: &ConceptKey, record: &ToscaPolicyType) -> BTreeMap<String, ToscaPolicyType> {
        let mut entry = BTreeMap::new();
        entry.insert(key.name.clone(), record.clone());
        entry
    }

    fn policy_entry(key: &ConceptKey, record: &ToscaPolicy) -> BTreeMap<String, ToscaPolicy> {
        let mut entry = BTreeMap::new();
        entry.insert(key.name.clone(), record.clone());
        entry
    }

    fn types_template(records: Vec<(ConceptKey, ToscaPolicyType)>) -> ToscaServiceTemplate {
        ToscaServiceTemplate::with_policy_types(
            records
                .iter()
                .map(|(key, record)| Self::type_entry(key, record))
                .collect(),
        )
    }

    fn policies_template(records: Vec<(ConceptKey, ToscaPolicy)>) -> ToscaServiceTemplate {
        ToscaServiceTemplate::with_policies(
            records
                .iter()
                .map(|(key, record)| Self::policy_entry(key, record))
                .collect(),
        )
    }

    fn guard_entry(policy_id: &str, output: &LegacyGuardPolicyOutput) -> GuardPolicyMap {
        let mut map = GuardPolicyMap::new();
        map.insert(policy_id.to_string(), output.clone());
        map
    }
}

#[async_trait]
impl PolicyStore for InMemoryPolicyStore {
    async fn get_policy_types(
        &self,
        name: Option<&str>,
        version: Option<&str>,
    ) -> StoreResult<ToscaServiceTemplate> {
        let types = self.policy_types.read().await;
        let records: Vec<_> = types
            .iter()
            .filter(|(key, _)| name.map_or(true, |n| key.name == n))
            .filter(|(key, _)| version.map_or(true, |v| key.version == v))
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect();
        Ok(Self::types_template(records))
    }

    async fn create_policy_types(
        &self,
        template: ToscaServiceTemplate,
    ) -> StoreResult<ToscaServiceTemplate> {
        let mut types = self.policy_types.write().await;
        let mut stored = Vec::new();
        for (entry_name, record) in template.policy_types_iter() {
            let name = record.name.clone().unwrap_or_else(|| entry_name.clone());
            let version = record.version.clone().ok_or_else(|| {
                StorageError::Backend(format!("policy type {name} has no version"))
            })?;
            let key = ConceptKey::new(&name, &version);
            let mut record = record.clone();
            record.name = Some(name);
            record.version = Some(version);
            types.insert(key.clone(), record.clone());
            stored.push((key, record));
        }
        Ok(Self::types_template(stored))
    }

    async fn delete_policy_type(
        &self,
        name: &str,
        version: &str,
    ) -> StoreResult<ToscaServiceTemplate> {
        let mut types = self.policy_types.write().await;
        let key = ConceptKey::new(name, version);
        let removed = match types.remove(&key) {
            Some(record) => vec![(key, record)],
            None => vec![],
        };
        Ok(Self::types_template(removed))
    }

    async fn get_policies(
        &self,
        policy_type_name: &str,
        policy_type_version: &str,
        name: Option<&str>,
        version: Option<&str>,
    ) -> StoreResult<ToscaServiceTemplate> {
        let policies = self.policies.read().await;
        let records: Vec<_> = policies
            .iter()
            .filter(|(_, record)| {
                record.policy_type.as_deref() == Some(policy_type_name)
                    && record.type_version.as_deref() == Some(policy_type_version)
            })
            .filter(|(key, _)| name.map_or(true, |n| key.name == n))
            .filter(|(key, _)| version.map_or(true, |v| key.version == v))
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect();
        Ok(Self::policies_template(records))
    }

    async fn create_policies(
        &self,
        policy_type_name: &str,
        policy_type_version: &str,
        template: ToscaServiceTemplate,
    ) -> StoreResult<ToscaServiceTemplate> {
        let mut policies = self.policies.write().await;
        let mut stored = Vec::new();
        for (entry_name, record) in template.policies_iter() {
            let name = record.name.clone().unwrap_or_else(|| entry_name.clone());
            let version = record
                .version
                .clone()
                .ok_or_else(|| StorageError::Backend(format!("policy {name} has no version")))?;
            let key = ConceptKey::new(&name, &version);
            let mut record = record.clone();
            record.name = Some(name);
            record.version = Some(version);
            record.policy_type = Some(policy_type_name.to_string());
            record.type_version = Some(policy_type_version.to_string());
            policies.insert(key.clone(), record.clone());
            stored.push((key, record));
        }
        Ok(Self::policies_template(stored))
    }

    async fn delete_policy(
        &self,
        policy_type_name: &str,
        policy_type_version: &str,
        name: &str,
        version: &str,
    ) -> StoreResult<ToscaServiceTemplate> {
        let mut policies = self.policies.write().await;
        let key = ConceptKey::new(name, version);
        let in_scope = policies.get(&key).is_some_and(|record| {
            record.policy_type.as_deref() == Some(policy_type_name)
                && record.type_version.as_deref() == Some(policy_type_version)
        });
        let removed = if in_scope {
            policies
                .remove(&key)
                .map(|record| vec![(key, record)])
                .unwrap_or_default()
        } else {
            vec![]
        };
        Ok(Self::policies_template(removed))
    }

    async fn get_guard_policy(
        &self,
        policy_id: &str,
        version: Option<&str>,
    ) -> StoreResult<GuardPolicyMap> {
        let guards = self.guard_policies.read().await;
        match version {
            Some(version) => Ok(guards
                .get(&(policy_id.to_string(), version.to_string()))
                .map(|output| Self::guard_entry(policy_id, output))
                .unwrap_or_default()),
            // No version selects the numerically latest one
            None => Ok(guards
                .iter()
                .filter(|((id, _), _)| id == policy_id)
                .max_by_key(|((_, version), _)| version.parse::<u32>().unwrap_or(0))
                .map(|((id, _), output)| Self::guard_entry(id, output))
                .unwrap_or_default()),
        }
    }

    async fn create_guard_policy(
        &self,
        input: LegacyGuardPolicyInput,
    ) -> StoreResult<GuardPolicyMap> {
        let version = input.policy_version.clone().ok_or_else(|| {
            StorageError::Backend(format!("guard policy {} has no version", input.policy_id))
        })?;
        let mut metadata = BTreeMap::new();
        metadata.insert(
            "policy-id".to_string(),
            serde_json::Value::String(input.policy_id.clone()),
        );
        metadata.insert(
            "policy-version".to_string(),
            serde_json::Value::String(version.clone()),
        );
        let properties = match input.content {
            Some(serde_json::Value::Object(map)) => map.into_iter().collect(),
            Some(other) => {
                let mut map = BTreeMap::new();
                map.insert("content".to_string(), other);
                map
            }
            None => BTreeMap::new(),
        };
        let output = LegacyGuardPolicyOutput {
            policy_type: "guard.policy".to_string(),
            version: version.clone(),
            metadata,
            properties,
        };
        let mut guards = self.guard_policies.write().await;
        guards.insert((input.policy_id.clone(), version.clone()), output.clone());
        Ok(Self::guard_entry(&input.policy_id, &output))
    }

    async fn delete_guard_policy(
        &self,
        policy_id: &str,
        version: &str,
    ) -> StoreResult<GuardPolicyMap> {
        let mut guards = self.guard_policies.write().await;
        Ok(guards
            .remove(&(policy_id.to_string(), version.to_string()))
            .map(|output| Self::guard_entry(policy_id, &output))
            .unwrap_or_default())
    }

    async fn get_filtered_pdp_groups(
        &self,
        filter: PdpGroupFilter,
    ) -> StoreResult<Vec<PdpGroup>> {
        let groups = self.pdp_groups.read().await;
        Ok(groups
            .iter()
            .filter(|group| filter.matches(group))
            .cloned()
            .collect())
    }

    async fn is_preloaded_policy_type(&self, name: &str, version: &str) -> StoreResult<bool> {
        Ok(self.preloaded.contains(&ConceptKey::new(name, version)))
    }
}
