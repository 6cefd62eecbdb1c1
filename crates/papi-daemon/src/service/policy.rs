//! Policy resource operations
//!
//! Every operation is scoped by an outer policy type version. Reads on an
//! unknown scope come back empty; writes on an unknown scope are a 404
//! citing the policy type.

use super::integrity;
use crate::error::{ApiError, ApiResult};
use crate::storage::PolicyStore;
use papi_types::{PdpGroupFilter, PolicyVersion, ToscaPolicyIdentifier, ToscaServiceTemplate};
use std::collections::BTreeSet;
use std::sync::Arc;

/// CRUD and version selection over policies
#[derive(Clone)]
pub struct PolicyService {
    store: Arc<dyn PolicyStore>,
}

impl PolicyService {
    pub fn new(store: Arc<dyn PolicyStore>) -> Self {
        Self { store }
    }

    /// Fetch policies under a policy type version, optionally narrowed
    pub async fn fetch_policies(
        &self,
        policy_type_name: &str,
        policy_type_version: &str,
        name: Option<&str>,
        version: Option<&str>,
    ) -> ApiResult<ToscaServiceTemplate> {
        let template = self
            .store
            .get_policies(policy_type_name, policy_type_version, name, version)
            .await?;
        if let Some(name) = name {
            if !template.has_policies() {
                return Err(ApiError::NotFound(unknown_policy_message(name, version)));
            }
        }
        Ok(template)
    }

    /// Resolve the `latest` or `deployed` pseudo-version of a named policy
    pub async fn fetch_latest_or_deployed(
        &self,
        policy_type_name: &str,
        policy_type_version: &str,
        name: &str,
        selector: &str,
    ) -> ApiResult<ToscaServiceTemplate> {
        match selector {
            "latest" => {
                self.fetch_latest(policy_type_name, policy_type_version, name)
                    .await
            }
            "deployed" => {
                self.fetch_deployed(policy_type_name, policy_type_version, name)
                    .await
            }
            other => Err(ApiError::BadRequest(format!(
                "invalid type value {other}, the type parameter must be \"latest\" or \"deployed\""
            ))),
        }
    }

    async fn fetch_latest(
        &self,
        policy_type_name: &str,
        policy_type_version: &str,
        name: &str,
    ) -> ApiResult<ToscaServiceTemplate> {
        let stored = self
            .store
            .get_policies(policy_type_name, policy_type_version, Some(name), None)
            .await?;
        let latest = stored
            .policies_iter()
            .filter_map(|(_, policy)| policy.version.as_deref())
            .filter_map(|version| version.parse::<PolicyVersion>().ok())
            .max()
            .ok_or_else(|| ApiError::NotFound(unknown_policy_message(name, None)))?;

        self.store
            .get_policies(
                policy_type_name,
                policy_type_version,
                Some(name),
                Some(&latest.to_string()),
            )
            .await
            .map_err(Into::into)
    }

    async fn fetch_deployed(
        &self,
        policy_type_name: &str,
        policy_type_version: &str,
        name: &str,
    ) -> ApiResult<ToscaServiceTemplate> {
        let filter = PdpGroupFilter::for_policies(vec![ToscaPolicyIdentifier::any_version(name)]);
        let groups = self.store.get_filtered_pdp_groups(filter).await?;

        let deployed_versions: BTreeSet<String> = groups
            .iter()
            .flat_map(|group| group.deployed_versions_of(name))
            .collect();
        if deployed_versions.is_empty() {
            return Err(ApiError::NotFound(format!(
                "policy with ID {name} is not deployed in any pdp group"
            )));
        }

        let mut entries = Vec::new();
        for version in &deployed_versions {
            let stored = self
                .store
                .get_policies(
                    policy_type_name,
                    policy_type_version,
                    Some(name),
                    Some(version),
                )
                .await?;
            entries.extend(stored.topology_template.into_iter().flat_map(|t| {
                t.policies.into_iter().flatten()
            }));
        }
        Ok(ToscaServiceTemplate::with_policies(entries))
    }

    /// Create the policies carried in a service template against a policy
    /// type version
    pub async fn create_policies(
        &self,
        policy_type_name: &str,
        policy_type_version: &str,
        body: ToscaServiceTemplate,
    ) -> ApiResult<ToscaServiceTemplate> {
        if !body.has_policies() {
            return Err(ApiError::BadRequest(
                "no policies specified in the service template".to_string(),
            ));
        }
        self.assert_policy_type_exists(policy_type_name, policy_type_version)
            .await?;

        let stored = self
            .store
            .create_policies(policy_type_name, policy_type_version, body)
            .await?;
        tracing::info!(
            policy_type = %policy_type_name,
            policy_type_version = %policy_type_version,
            count = stored.policies_iter().count(),
            "Created policies"
        );
        Ok(stored)
    }

    /// Delete one version of a policy
    pub async fn delete_policy(
        &self,
        policy_type_name: &str,
        policy_type_version: &str,
        name: &str,
        version: &str,
    ) -> ApiResult<ToscaServiceTemplate> {
        self.assert_policy_type_exists(policy_type_name, policy_type_version)
            .await?;
        let existing = self
            .store
            .get_policies(
                policy_type_name,
                policy_type_version,
                Some(name),
                Some(version),
            )
            .await?;
        if !existing.has_policies() {
            return Err(ApiError::NotFound(unknown_policy_message(
                name,
                Some(version),
            )));
        }

        integrity::assert_policy_undeployed(&*self.store, name, version).await?;

        let removed = self
            .store
            .delete_policy(policy_type_name, policy_type_version, name, version)
            .await?;
        tracing::info!(policy = %name, version = %version, "Deleted policy");
        Ok(removed)
    }

    /// Delete every version of a policy, rule-checking all of them first
    pub async fn delete_all_versions(
        &self,
        policy_type_name: &str,
        policy_type_version: &str,
        name: &str,
    ) -> ApiResult<ToscaServiceTemplate> {
        self.assert_policy_type_exists(policy_type_name, policy_type_version)
            .await?;
        let existing = self
            .store
            .get_policies(policy_type_name, policy_type_version, Some(name), None)
            .await?;
        if !existing.has_policies() {
            return Err(ApiError::NotFound(unknown_policy_message(name, None)));
        }

        let versions: Vec<String> = existing
            .policies_iter()
            .filter_map(|(_, policy)| policy.version.clone())
            .collect();

        for version in &versions {
            integrity::assert_policy_undeployed(&*self.store, name, version).await?;
        }

        let mut removed_entries = Vec::new();
        for version in &versions {
            let removed = self
                .store
                .delete_policy(policy_type_name, policy_type_version, name, version)
                .await?;
            removed_entries.extend(removed.topology_template.into_iter().flat_map(|t| {
                t.policies.into_iter().flatten()
            }));
        }
        tracing::info!(policy = %name, versions = versions.len(), "Deleted policy");
        Ok(ToscaServiceTemplate::with_policies(removed_entries))
    }

    async fn assert_policy_type_exists(
        &self,
        policy_type_name: &str,
        policy_type_version: &str,
    ) -> ApiResult<()> {
        let types = self
            .store
            .get_policy_types(Some(policy_type_name), Some(policy_type_version))
            .await?;
        if !types.has_policy_types() {
            return Err(ApiError::NotFound(format!(
                "policy type with ID {policy_type_name}:{policy_type_version} does not exist"
            )));
        }
        Ok(())
    }
}

fn unknown_policy_message(name: &str, version: Option<&str>) -> String {
    match version {
        Some(version) => format!("policy with ID {name}:{version} does not exist"),
        None => format!("policy with ID {name} does not exist"),
    }
}
