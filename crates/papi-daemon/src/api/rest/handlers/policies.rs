//! Policy handlers
//!
//! All paths are scoped by a policy type name and version taken from the
//! outer path segments.

use crate::api::rest::respond::negotiate;
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Response,
    Json,
};
use papi_types::ToscaServiceTemplate;
use serde::Deserialize;

/// Pseudo-version selector for the list-versions path
#[derive(Debug, Deserialize)]
pub struct VersionSelectorQuery {
    #[serde(rename = "type")]
    pub selector: Option<String>,
}

/// List every policy under a policy type version
pub async fn list_policies(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((policy_type_id, policy_type_version)): Path<(String, String)>,
) -> ApiResult<Response> {
    state.stats.record_policy_get();
    let template = state
        .policies
        .fetch_policies(&policy_type_id, &policy_type_version, None, None)
        .await?;
    Ok(negotiate(&headers, template))
}

/// Create the policies in a service template
pub async fn create_policies(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((policy_type_id, policy_type_version)): Path<(String, String)>,
    Json(body): Json<ToscaServiceTemplate>,
) -> ApiResult<Response> {
    state.stats.record_policy_post();
    let stored = state
        .policies
        .create_policies(&policy_type_id, &policy_type_version, body)
        .await?;
    Ok(negotiate(&headers, stored))
}

/// List every version of one policy
pub async fn get_policy_versions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((policy_type_id, policy_type_version, policy_id)): Path<(String, String, String)>,
) -> ApiResult<Response> {
    state.stats.record_policy_get();
    let template = state
        .policies
        .fetch_policies(
            &policy_type_id,
            &policy_type_version,
            Some(&policy_id),
            None,
        )
        .await?;
    Ok(negotiate(&headers, template))
}

/// Delete every version of one policy
pub async fn delete_policy_versions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((policy_type_id, policy_type_version, policy_id)): Path<(String, String, String)>,
) -> ApiResult<Response> {
    state.stats.record_policy_delete();
    let removed = state
        .policies
        .delete_all_versions(&policy_type_id, &policy_type_version, &policy_id)
        .await?;
    Ok(negotiate(&headers, removed))
}

/// Resolve the `latest` or `deployed` pseudo-version of one policy
pub async fn get_selected_policy_version(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((policy_type_id, policy_type_version, policy_id)): Path<(String, String, String)>,
    Query(query): Query<VersionSelectorQuery>,
) -> ApiResult<Response> {
    state.stats.record_policy_get();
    let selector = query.selector.ok_or_else(|| {
        ApiError::BadRequest(
            "the type parameter must be \"latest\" or \"deployed\"".to_string(),
        )
    })?;
    let template = state
        .policies
        .fetch_latest_or_deployed(
            &policy_type_id,
            &policy_type_version,
            &policy_id,
            &selector,
        )
        .await?;
    Ok(negotiate(&headers, template))
}

/// Fetch one policy version
pub async fn get_policy(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((policy_type_id, policy_type_version, policy_id, version_id)): Path<(
        String,
        String,
        String,
        String,
    )>,
) -> ApiResult<Response> {
    state.stats.record_policy_get();
    let template = state
        .policies
        .fetch_policies(
            &policy_type_id,
            &policy_type_version,
            Some(&policy_id),
            Some(&version_id),
        )
        .await?;
    Ok(negotiate(&headers, template))
}

/// Delete one policy version
pub async fn delete_policy(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((policy_type_id, policy_type_version, policy_id, version_id)): Path<(
        String,
        String,
        String,
        String,
    )>,
) -> ApiResult<Response> {
    state.stats.record_policy_delete();
    let removed = state
        .policies
        .delete_policy(
            &policy_type_id,
            &policy_type_version,
            &policy_id,
            &version_id,
        )
        .await?;
    Ok(negotiate(&headers, removed))
}
