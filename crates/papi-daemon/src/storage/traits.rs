//! Storage trait definitions
//!
//! The daemon depends on an abstract models store. Null-able arguments
//! broaden queries: a `None` name means all names, a `None` version with a
//! `Some` name means all versions of that name. The pseudo-version values
//! `latest` and `deployed` are resolved by the service layer and never reach
//! a store implementation.

use crate::error::StorageError;
use async_trait::async_trait;
use papi_types::{
    GuardPolicyMap, LegacyGuardPolicyInput, PdpGroup, PdpGroupFilter, ToscaServiceTemplate,
};

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StorageError>;

/// The models store contract
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Get policy types, optionally narrowed by name and version
    async fn get_policy_types(
        &self,
        name: Option<&str>,
        version: Option<&str>,
    ) -> StoreResult<ToscaServiceTemplate>;

    /// Persist the policy types in a service template, returning the stored form
    async fn create_policy_types(
        &self,
        template: ToscaServiceTemplate,
    ) -> StoreResult<ToscaServiceTemplate>;

    /// Delete one policy type version, returning the removed records
    async fn delete_policy_type(
        &self,
        name: &str,
        version: &str,
    ) -> StoreResult<ToscaServiceTemplate>;

    /// Get policies bound to a policy type version, optionally narrowed
    async fn get_policies(
        &self,
        policy_type_name: &str,
        policy_type_version: &str,
        name: Option<&str>,
        version: Option<&str>,
    ) -> StoreResult<ToscaServiceTemplate>;

    /// Persist the policies in a service template against a policy type version
    async fn create_policies(
        &self,
        policy_type_name: &str,
        policy_type_version: &str,
        template: ToscaServiceTemplate,
    ) -> StoreResult<ToscaServiceTemplate>;

    /// Delete one policy version, returning the removed records
    async fn delete_policy(
        &self,
        policy_type_name: &str,
        policy_type_version: &str,
        name: &str,
        version: &str,
    ) -> StoreResult<ToscaServiceTemplate>;

    /// Get guard policies by id; `None` version selects the latest
    async fn get_guard_policy(
        &self,
        policy_id: &str,
        version: Option<&str>,
    ) -> StoreResult<GuardPolicyMap>;

    /// Persist a guard policy
    async fn create_guard_policy(
        &self,
        input: LegacyGuardPolicyInput,
    ) -> StoreResult<GuardPolicyMap>;

    /// Delete a guard policy version, returning the removed records
    async fn delete_guard_policy(
        &self,
        policy_id: &str,
        version: &str,
    ) -> StoreResult<GuardPolicyMap>;

    /// PDP groups passing the filter, in store order
    async fn get_filtered_pdp_groups(&self, filter: PdpGroupFilter)
        -> StoreResult<Vec<PdpGroup>>;

    /// Whether a policy type version is system-supplied and undeletable
    async fn is_preloaded_policy_type(&self, name: &str, version: &str) -> StoreResult<bool>;
}
