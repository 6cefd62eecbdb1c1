//! Legacy guard policy handlers
//!
//! Guard routes live under the fixed
//! `/policytypes/onap.policies.controlloop.Guard/versions/1.0.0` prefix and
//! speak the flat guard payload instead of TOSCA service templates. They
//! count against the policy statistics like any other policy operation.

use crate::api::rest::respond::negotiate;
use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Response,
    Json,
};
use papi_types::LegacyGuardPolicyInput;
use serde::Deserialize;

/// Optional bare legacy version
#[derive(Debug, Deserialize)]
pub struct GuardVersionQuery {
    pub version: Option<String>,
}

/// Fetch guard policies by id, latest version unless one is asked for
pub async fn get_guard_policy(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(policy_id): Path<String>,
    Query(query): Query<GuardVersionQuery>,
) -> ApiResult<Response> {
    state.stats.record_policy_get();
    let policies = state
        .guards
        .fetch_guard_policy(&policy_id, query.version.as_deref())
        .await?;
    Ok(negotiate(&headers, policies))
}

/// Fetch deployed guard policies keyed by PDP group
pub async fn get_deployed_guard_policies(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(policy_id): Path<String>,
) -> ApiResult<Response> {
    state.stats.record_policy_get();
    let deployed = state.guards.fetch_deployed_guard_policies(&policy_id).await?;
    Ok(negotiate(&headers, deployed))
}

/// Create a guard policy
pub async fn create_guard_policy(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<LegacyGuardPolicyInput>,
) -> ApiResult<Response> {
    state.stats.record_policy_post();
    let stored = state.guards.create_guard_policy(body).await?;
    Ok(negotiate(&headers, stored))
}

/// Delete a guard policy version
pub async fn delete_guard_policy(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((policy_id, version_id)): Path<(String, String)>,
) -> ApiResult<Response> {
    state.stats.record_policy_delete();
    let removed = state
        .guards
        .delete_guard_policy(&policy_id, &version_id)
        .await?;
    Ok(negotiate(&headers, removed))
}
