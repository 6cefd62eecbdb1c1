//! Policy type handlers

use crate::api::rest::respond::negotiate;
use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
    Json,
};
use papi_types::ToscaServiceTemplate;

/// List every policy type in the store
pub async fn list_policy_types(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    state.stats.record_policy_type_get();
    let template = state.policy_types.fetch_policy_types(None, None).await?;
    Ok(negotiate(&headers, template))
}

/// Create the policy types in a service template
pub async fn create_policy_types(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ToscaServiceTemplate>,
) -> ApiResult<Response> {
    state.stats.record_policy_type_post();
    let stored = state.policy_types.create_policy_types(body).await?;
    Ok(negotiate(&headers, stored))
}

/// List every version of one policy type
pub async fn get_policy_type_versions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(policy_type_id): Path<String>,
) -> ApiResult<Response> {
    state.stats.record_policy_type_get();
    let template = state
        .policy_types
        .fetch_policy_types(Some(&policy_type_id), None)
        .await?;
    Ok(negotiate(&headers, template))
}

/// Delete every version of one policy type
pub async fn delete_policy_type_versions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(policy_type_id): Path<String>,
) -> ApiResult<Response> {
    state.stats.record_policy_type_delete();
    let removed = state.policy_types.delete_all_versions(&policy_type_id).await?;
    Ok(negotiate(&headers, removed))
}

/// Fetch one policy type version
pub async fn get_policy_type(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((policy_type_id, version_id)): Path<(String, String)>,
) -> ApiResult<Response> {
    state.stats.record_policy_type_get();
    let template = state
        .policy_types
        .fetch_policy_types(Some(&policy_type_id), Some(&version_id))
        .await?;
    Ok(negotiate(&headers, template))
}

/// Delete one policy type version
pub async fn delete_policy_type(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((policy_type_id, version_id)): Path<(String, String)>,
) -> ApiResult<Response> {
    state.stats.record_policy_type_delete();
    let removed = state
        .policy_types
        .delete_policy_type(&policy_type_id, &version_id)
        .await?;
    Ok(negotiate(&headers, removed))
}
