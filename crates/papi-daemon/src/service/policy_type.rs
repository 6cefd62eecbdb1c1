//! Policy type resource operations

use super::integrity;
use crate::error::{ApiError, ApiResult};
use crate::storage::PolicyStore;
use papi_types::ToscaServiceTemplate;
use std::sync::Arc;

/// CRUD and version selection over policy types
#[derive(Clone)]
pub struct PolicyTypeService {
    store: Arc<dyn PolicyStore>,
}

impl PolicyTypeService {
    pub fn new(store: Arc<dyn PolicyStore>) -> Self {
        Self { store }
    }

    /// Fetch policy types matching the given name and version
    ///
    /// Both arguments `None` lists the whole store and an empty result is a
    /// success; a named query that comes back empty is a 404.
    pub async fn fetch_policy_types(
        &self,
        name: Option<&str>,
        version: Option<&str>,
    ) -> ApiResult<ToscaServiceTemplate> {
        let template = self.store.get_policy_types(name, version).await?;
        if let Some(name) = name {
            if !template.has_policy_types() {
                return Err(ApiError::NotFound(unknown_policy_type_message(
                    name, version,
                )));
            }
        }
        Ok(template)
    }

    /// Create the policy types carried in a service template
    pub async fn create_policy_types(
        &self,
        body: ToscaServiceTemplate,
    ) -> ApiResult<ToscaServiceTemplate> {
        if !body.has_policy_types() {
            return Err(ApiError::BadRequest(
                "no policy types specified in the service template".to_string(),
            ));
        }
        let stored = self.store.create_policy_types(body).await?;
        tracing::info!(
            count = stored.policy_types_iter().count(),
            "Created policy types"
        );
        Ok(stored)
    }

    /// Delete one version of a policy type
    pub async fn delete_policy_type(
        &self,
        name: &str,
        version: &str,
    ) -> ApiResult<ToscaServiceTemplate> {
        let existing = self
            .store
            .get_policy_types(Some(name), Some(version))
            .await?;
        if !existing.has_policy_types() {
            return Err(ApiError::NotFound(unknown_policy_type_message(
                name,
                Some(version),
            )));
        }

        integrity::assert_policy_type_deletable(&*self.store, name, version).await?;

        let removed = self.store.delete_policy_type(name, version).await?;
        tracing::info!(policy_type = %name, version = %version, "Deleted policy type");
        Ok(removed)
    }

    /// Delete every version of a policy type
    ///
    /// All versions are rule-checked before the first destructive call so a
    /// conflict on any version leaves the store untouched.
    pub async fn delete_all_versions(&self, name: &str) -> ApiResult<ToscaServiceTemplate> {
        let existing = self.store.get_policy_types(Some(name), None).await?;
        if !existing.has_policy_types() {
            return Err(ApiError::NotFound(unknown_policy_type_message(name, None)));
        }

        let versions: Vec<String> = existing
            .policy_types_iter()
            .filter_map(|(_, record)| record.version.clone())
            .collect();

        for version in &versions {
            integrity::assert_policy_type_deletable(&*self.store, name, version).await?;
        }

        let mut removed_entries = Vec::new();
        for version in &versions {
            let removed = self.store.delete_policy_type(name, version).await?;
            removed_entries.extend(removed.policy_types.into_iter().flatten());
        }
        tracing::info!(policy_type = %name, versions = versions.len(), "Deleted policy type");
        Ok(ToscaServiceTemplate::with_policy_types(removed_entries))
    }
}

fn unknown_policy_type_message(name: &str, version: Option<&str>) -> String {
    match version {
        Some(version) => format!("policy type with ID {name}:{version} does not exist"),
        None => format!("policy type with ID {name} does not exist"),
    }
}
