//! Health and statistics handlers

use crate::api::rest::respond::negotiate;
use crate::api::rest::state::AppState;
use axum::{extract::State, http::HeaderMap, response::Response};
use serde::Serialize;

/// Healthcheck report body
#[derive(Debug, Serialize)]
pub struct HealthCheckReport {
    pub name: String,
    pub url: String,
    pub healthy: bool,
    pub code: u16,
    pub message: String,
}

/// Report liveness
pub async fn healthcheck(headers: HeaderMap) -> Response {
    negotiate(
        &headers,
        HealthCheckReport {
            name: "Policy API".to_string(),
            url: "self".to_string(),
            healthy: true,
            code: 200,
            message: "alive".to_string(),
        },
    )
}

/// Report invocation statistics
pub async fn statistics(State(state): State<AppState>, headers: HeaderMap) -> Response {
    negotiate(&headers, state.stats.report())
}
