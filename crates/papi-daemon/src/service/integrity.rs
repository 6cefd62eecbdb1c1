//! Deletion rule engine
//!
//! Two referential-integrity rules guard destructive operations:
//!
//! - a policy version deployed in any PDP group cannot be deleted
//! - a policy type parameterized by any policy, or marked system-supplied,
//!   cannot be deleted
//!
//! Both checks run before any destructive store call so a refused delete
//! never partially applies. The check-then-delete window is racy against a
//! concurrent creator of a dependent; the store's own integrity enforcement
//! turns that race into a storage failure.

use crate::error::{ApiError, ApiResult};
use crate::storage::PolicyStore;
use papi_types::{ConceptKey, PdpGroup, PdpGroupFilter, ToscaPolicyIdentifier};

/// Rule P: refuse to delete a policy version deployed in any PDP group
pub async fn assert_policy_undeployed(
    store: &dyn PolicyStore,
    name: &str,
    version: &str,
) -> ApiResult<()> {
    let filter =
        PdpGroupFilter::for_policies(vec![ToscaPolicyIdentifier::exact(name, version)]);
    let groups = store.get_filtered_pdp_groups(filter).await?;
    if !groups.is_empty() {
        return Err(ApiError::Conflict(deployed_violation_message(
            name, version, &groups,
        )));
    }
    Ok(())
}

/// Rule T: refuse to delete a pre-defined or still-parameterized policy type
pub async fn assert_policy_type_deletable(
    store: &dyn PolicyStore,
    name: &str,
    version: &str,
) -> ApiResult<()> {
    if store.is_preloaded_policy_type(name, version).await? {
        return Err(ApiError::Conflict(format!(
            "pre-defined policy type {name}:{version} cannot be deleted"
        )));
    }

    let policies = store.get_policies(name, version, None, None).await?;
    let referencing: Vec<ConceptKey> = policies
        .policies_iter()
        .filter_map(|(_, policy)| policy.key())
        .collect();
    if !referencing.is_empty() {
        return Err(ApiError::Conflict(parameterized_violation_message(
            name,
            version,
            &referencing,
        )));
    }
    Ok(())
}

/// Conflict message for a deployed policy, dependents in store order
pub fn deployed_violation_message(name: &str, version: &str, groups: &[PdpGroup]) -> String {
    let deployed: Vec<String> = groups.iter().map(|g| g.key().to_string()).collect();
    format!(
        "policy with ID {name}:{version} cannot be deleted as it is deployed in pdp groups {}",
        deployed.join(",")
    )
}

fn parameterized_violation_message(name: &str, version: &str, policies: &[ConceptKey]) -> String {
    let referencing: Vec<String> = policies.iter().map(|key| key.to_string()).collect();
    format!(
        "policy type with ID {name}:{version} cannot be deleted as it is parameterized by policies {}",
        referencing.join(",")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryPolicyStore;
    use papi_types::{ToscaPolicy, ToscaServiceTemplate};
    use std::collections::BTreeMap;

    fn policy_template(name: &str, version: &str) -> ToscaServiceTemplate {
        let mut entry = BTreeMap::new();
        entry.insert(
            name.to_string(),
            ToscaPolicy {
                version: Some(version.to_string()),
                ..Default::default()
            },
        );
        ToscaServiceTemplate::with_policies(vec![entry])
    }

    fn deployed_group(name: &str, version: &str, policy: ConceptKey) -> PdpGroup {
        PdpGroup {
            name: name.to_string(),
            version: version.to_string(),
            policies: vec![policy],
            supported_policy_types: vec![],
        }
    }

    #[tokio::test]
    async fn undeployed_policies_pass_rule_p() {
        let store = InMemoryPolicyStore::new();
        assert!(assert_policy_undeployed(&store, "p", "1.0.0").await.is_ok());
    }

    #[tokio::test]
    async fn deployed_policies_conflict_with_full_group_list() {
        let store = InMemoryPolicyStore::new();
        store
            .set_pdp_groups(vec![
                deployed_group("gA", "1", ConceptKey::new("p", "1.0.0")),
                deployed_group("gB", "2", ConceptKey::new("p", "1.0.0")),
            ])
            .await;

        let err = assert_policy_undeployed(&store, "p", "1.0.0")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "policy with ID p:1.0.0 cannot be deleted as it is deployed in pdp groups gA:1,gB:2"
        );
    }

    #[tokio::test]
    async fn other_versions_do_not_trip_rule_p() {
        let store = InMemoryPolicyStore::new();
        store
            .set_pdp_groups(vec![deployed_group(
                "gA",
                "1",
                ConceptKey::new("p", "2.0.0"),
            )])
            .await;
        assert!(assert_policy_undeployed(&store, "p", "1.0.0").await.is_ok());
    }

    #[tokio::test]
    async fn parameterized_policy_types_conflict() {
        let store = InMemoryPolicyStore::new();
        store
            .create_policies("pt", "1.0.0", policy_template("p", "1.0.0"))
            .await
            .unwrap();
        store
            .create_policies("pt", "1.0.0", policy_template("p", "2.0.0"))
            .await
            .unwrap();

        let err = assert_policy_type_deletable(&store, "pt", "1.0.0")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "policy type with ID pt:1.0.0 cannot be deleted as it is parameterized by policies p:1.0.0,p:2.0.0"
        );
    }

    #[tokio::test]
    async fn pre_defined_policy_types_are_never_deletable() {
        let store = InMemoryPolicyStore::with_preloaded(vec![ConceptKey::new("pt", "1.0.0")]);
        let err = assert_policy_type_deletable(&store, "pt", "1.0.0")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "pre-defined policy type pt:1.0.0 cannot be deleted"
        );
    }

    #[tokio::test]
    async fn unreferenced_policy_types_pass_rule_t() {
        let store = InMemoryPolicyStore::new();
        assert!(assert_policy_type_deletable(&store, "pt", "1.0.0")
            .await
            .is_ok());
    }
}
