//! Legacy guard policy operations
//!
//! Guard policies carry bare integer versions and no explicit policy type;
//! the id prefix selects the type. Deployment state records the canonical
//! `N.0.0` form, so the delete-eligibility check rewrites the version before
//! consulting the PDP group store. The storage delete itself still sees the
//! bare legacy version.

use super::{integrity, valid_number};
use crate::error::{ApiError, ApiResult};
use crate::storage::PolicyStore;
use papi_types::{
    ConceptKey, GuardPolicyMap, LegacyGuardPolicyInput, PdpGroupFilter, PolicyVersion,
    ToscaPolicyIdentifier, INVALID_LEGACY_VERSION,
};
use std::collections::BTreeMap;
use std::sync::Arc;

const LEGACY_MINOR_PATCH_SUFFIX: &str = ".0.0";

// First match wins; iteration order is significant.
const GUARD_POLICY_TYPES: &[(&str, &str)] = &[
    (
        "guard.frequency.",
        "onap.policies.controlloop.guard.FrequencyLimiter:1.0.0",
    ),
    (
        "guard.minmax.",
        "onap.policies.controlloop.guard.MinMax:1.0.0",
    ),
    (
        "guard.blacklist.",
        "onap.policies.controlloop.guard.Blacklist:1.0.0",
    ),
];

/// Guard policy adapter over the models store
#[derive(Clone)]
pub struct GuardPolicyService {
    store: Arc<dyn PolicyStore>,
}

impl GuardPolicyService {
    pub fn new(store: Arc<dyn PolicyStore>) -> Self {
        Self { store }
    }

    /// Fetch guard policies by id, optionally at one legacy version
    pub async fn fetch_guard_policy(
        &self,
        policy_id: &str,
        version: Option<&str>,
    ) -> ApiResult<GuardPolicyMap> {
        if let Some(version) = version {
            valid_number(version, INVALID_LEGACY_VERSION)?;
        }
        self.store
            .get_guard_policy(policy_id, version)
            .await
            .map_err(Into::into)
    }

    /// Create a guard policy
    pub async fn create_guard_policy(
        &self,
        body: LegacyGuardPolicyInput,
    ) -> ApiResult<GuardPolicyMap> {
        let stored = self.store.create_guard_policy(body).await?;
        tracing::info!(count = stored.len(), "Created guard policy");
        Ok(stored)
    }

    /// Delete a guard policy version
    ///
    /// The deployment lookup uses the canonical `N.0.0` identifier; the
    /// storage delete keeps the bare legacy version.
    pub async fn delete_guard_policy(
        &self,
        policy_id: &str,
        version: &str,
    ) -> ApiResult<GuardPolicyMap> {
        valid_number(version, INVALID_LEGACY_VERSION)?;
        self.validate_delete_eligibility(policy_id, version).await?;

        let removed = self.store.delete_guard_policy(policy_id, version).await?;
        tracing::info!(policy_id = %policy_id, version = %version, "Deleted guard policy");
        Ok(removed)
    }

    /// Fetch deployed guard policies keyed by the PDP group they run in
    pub async fn fetch_deployed_guard_policies(
        &self,
        policy_id: &str,
    ) -> ApiResult<BTreeMap<String, GuardPolicyMap>> {
        let type_key = guard_policy_type(policy_id)?;
        let filter = PdpGroupFilter::for_policy_types(vec![ToscaPolicyIdentifier::exact(
            type_key.name,
            type_key.version,
        )]);
        let groups = self.store.get_filtered_pdp_groups(filter).await?;

        let mut deployed = BTreeMap::new();
        for group in groups {
            let mut per_group = GuardPolicyMap::new();
            for version in group.deployed_versions_of(policy_id) {
                // Deployment state holds canonical three-part versions;
                // guard storage is keyed by the bare major.
                let legacy = match version.parse::<PolicyVersion>() {
                    Ok(parsed) => parsed.major.to_string(),
                    Err(_) => version.clone(),
                };
                per_group.extend(self.store.get_guard_policy(policy_id, Some(&legacy)).await?);
            }
            if !per_group.is_empty() {
                deployed.insert(group.key().to_string(), per_group);
            }
        }
        Ok(deployed)
    }

    async fn validate_delete_eligibility(&self, policy_id: &str, version: &str) -> ApiResult<()> {
        let lookup_version = format!("{version}{LEGACY_MINOR_PATCH_SUFFIX}");
        let filter = PdpGroupFilter::for_policies(vec![ToscaPolicyIdentifier::exact(
            policy_id,
            lookup_version,
        )]);
        let groups = self.store.get_filtered_pdp_groups(filter).await?;
        if !groups.is_empty() {
            // The violation message cites the version the client supplied
            return Err(ApiError::Conflict(integrity::deployed_violation_message(
                policy_id, version, &groups,
            )));
        }
        Ok(())
    }
}

fn guard_policy_type(policy_id: &str) -> ApiResult<ConceptKey> {
    for (prefix, type_key) in GUARD_POLICY_TYPES {
        if policy_id.starts_with(prefix) {
            return type_key
                .parse()
                .map_err(|_| ApiError::BadRequest(format!("No policy type defined for {policy_id}")));
        }
    }
    Err(ApiError::BadRequest(format!(
        "No policy type defined for {policy_id}"
    )))
}
