//! Application state for API handlers

use crate::service::{GuardPolicyService, PolicyService, PolicyTypeService};
use crate::stats::ApiStatistics;
use crate::storage::PolicyStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Models store backend
    pub store: Arc<dyn PolicyStore>,

    /// Policy type resource
    pub policy_types: PolicyTypeService,

    /// Policy resource
    pub policies: PolicyService,

    /// Legacy guard adapter
    pub guards: GuardPolicyService,

    /// Invocation counters
    pub stats: Arc<ApiStatistics>,
}

impl AppState {
    /// Create new application state over a store
    pub fn new(store: Arc<dyn PolicyStore>) -> Self {
        Self {
            policy_types: PolicyTypeService::new(store.clone()),
            policies: PolicyService::new(store.clone()),
            guards: GuardPolicyService::new(store.clone()),
            store,
            stats: Arc::new(ApiStatistics::new()),
        }
    }
}
