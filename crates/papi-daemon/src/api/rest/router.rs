//! API router configuration
//!
//! Every route hangs off the `/policy/api/v1` base path. The legacy guard
//! routes are registered under the literal
//! `onap.policies.controlloop.Guard/versions/1.0.0` segments; static
//! segments win over captures, so they coexist with the generic policy
//! routes, and `versions/deployed` wins over `versions/:version_id` the
//! same way.

use super::handlers;
use super::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

const GUARD_BASE: &str = "/policytypes/onap.policies.controlloop.Guard/versions/1.0.0";

/// Create the main API router
pub fn create_router(state: AppState, enable_cors: bool) -> Router {
    let api_routes = Router::new()
        // Health and statistics
        .route("/healthcheck", get(handlers::healthcheck))
        .route("/statistics", get(handlers::statistics))
        // Policy types
        .route(
            "/policytypes",
            get(handlers::list_policy_types).post(handlers::create_policy_types),
        )
        .route(
            "/policytypes/:policy_type_id",
            get(handlers::get_policy_type_versions).delete(handlers::delete_policy_type_versions),
        )
        .route(
            "/policytypes/:policy_type_id/versions/:version_id",
            get(handlers::get_policy_type).delete(handlers::delete_policy_type),
        )
        // Policies, scoped by policy type version
        .route(
            "/policytypes/:policy_type_id/versions/:version_id/policies",
            get(handlers::list_policies).post(handlers::create_policies),
        )
        .route(
            "/policytypes/:policy_type_id/versions/:version_id/policies/:policy_id",
            get(handlers::get_policy_versions).delete(handlers::delete_policy_versions),
        )
        .route(
            "/policytypes/:policy_type_id/versions/:version_id/policies/:policy_id/versions",
            get(handlers::get_selected_policy_version),
        )
        .route(
            "/policytypes/:policy_type_id/versions/:version_id/policies/:policy_id/versions/:policy_version_id",
            get(handlers::get_policy).delete(handlers::delete_policy),
        )
        // Legacy guard policies
        .route(
            &format!("{GUARD_BASE}/policies"),
            post(handlers::create_guard_policy),
        )
        .route(
            &format!("{GUARD_BASE}/policies/:policy_id"),
            get(handlers::get_guard_policy),
        )
        .route(
            &format!("{GUARD_BASE}/policies/:policy_id/versions/deployed"),
            get(handlers::get_deployed_guard_policies),
        )
        .route(
            &format!("{GUARD_BASE}/policies/:policy_id/versions/:version_id"),
            delete(handlers::delete_guard_policy),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            record_api_call,
        ));

    let mut router = Router::new()
        .nest("/policy/api/v1", api_routes)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router.with_state(state)
}

/// Count every API call and its outcome
async fn record_api_call(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    state.stats.record_api_call(response.status().as_u16() < 400);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryPolicyStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use papi_types::{ConceptKey, PdpGroup};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<InMemoryPolicyStore>) {
        let store = Arc::new(InMemoryPolicyStore::new());
        let router = create_router(AppState::new(store.clone()), true);
        (router, store)
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn policy_type_body(name: &str, version: &str) -> serde_json::Value {
        serde_json::json!({
            "tosca_definitions_version": "tosca_simple_yaml_1_0_0",
            "policy_types": [{ name: { "version": version } }]
        })
    }

    fn policy_body(name: &str, version: &str) -> serde_json::Value {
        serde_json::json!({
            "tosca_definitions_version": "tosca_simple_yaml_1_0_0",
            "topology_template": {
                "policies": [{ name: { "version": version } }]
            }
        })
    }

    async fn seed_policy_versions(app: &Router, versions: &[&str]) {
        let (status, _) = send(
            app,
            "POST",
            "/policy/api/v1/policytypes",
            Some(policy_type_body("pt", "1.0.0")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        for version in versions {
            let (status, _) = send(
                app,
                "POST",
                "/policy/api/v1/policytypes/pt/versions/1.0.0/policies",
                Some(policy_body("p", version)),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn policy_types_round_trip() {
        let (app, _) = app();
        let (status, _) = send(
            &app,
            "POST",
            "/policy/api/v1/policytypes",
            Some(policy_type_body("onap.policies.Test", "1.0.0")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            "GET",
            "/policy/api/v1/policytypes/onap.policies.Test/versions/1.0.0",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["policy_types"][0]["onap.policies.Test"]["version"],
            "1.0.0"
        );
    }

    #[tokio::test]
    async fn latest_selects_the_greatest_stored_version() {
        let (app, _) = app();
        seed_policy_versions(&app, &["1.0.0", "1.2.0", "2.0.0"]).await;

        let (status, body) = send(
            &app,
            "GET",
            "/policy/api/v1/policytypes/pt/versions/1.0.0/policies/p/versions?type=latest",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["topology_template"]["policies"][0]["p"]["version"],
            "2.0.0"
        );
    }

    #[tokio::test]
    async fn deployed_selection_without_pdp_groups_is_not_found() {
        let (app, _) = app();
        seed_policy_versions(&app, &["1.0.0", "1.2.0", "2.0.0"]).await;

        let (status, body) = send(
            &app,
            "GET",
            "/policy/api/v1/policytypes/pt/versions/1.0.0/policies/p/versions?type=deployed",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"],
            "policy with ID p is not deployed in any pdp group"
        );
    }

    #[tokio::test]
    async fn deleting_a_deployed_policy_conflicts() {
        let (app, store) = app();
        seed_policy_versions(&app, &["1.0.0"]).await;
        store
            .set_pdp_groups(vec![PdpGroup {
                name: "gA".to_string(),
                version: "1".to_string(),
                policies: vec![ConceptKey::new("p", "1.0.0")],
                supported_policy_types: vec![],
            }])
            .await;

        let (status, body) = send(
            &app,
            "DELETE",
            "/policy/api/v1/policytypes/pt/versions/1.0.0/policies/p/versions/1.0.0",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body["error"],
            "policy with ID p:1.0.0 cannot be deleted as it is deployed in pdp groups gA:1"
        );
    }

    #[tokio::test]
    async fn guard_deletes_check_deployment_with_the_canonical_version() {
        let (app, store) = app();
        let (status, _) = send(
            &app,
            "POST",
            "/policy/api/v1/policytypes/onap.policies.controlloop.Guard/versions/1.0.0/policies",
            Some(serde_json::json!({
                "policy-id": "guard.frequency.foo",
                "policy-version": "3",
                "content": { "actor": "SO" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // Deployment state carries the canonical three-part identifier
        store
            .set_pdp_groups(vec![PdpGroup {
                name: "gA".to_string(),
                version: "1".to_string(),
                policies: vec![ConceptKey::new("guard.frequency.foo", "3.0.0")],
                supported_policy_types: vec![],
            }])
            .await;

        let (status, body) = send(
            &app,
            "DELETE",
            "/policy/api/v1/policytypes/onap.policies.controlloop.Guard/versions/1.0.0/policies/guard.frequency.foo/versions/3",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body["error"],
            "policy with ID guard.frequency.foo:3 cannot be deleted as it is deployed in pdp groups gA:1"
        );
    }

    #[tokio::test]
    async fn unknown_version_selectors_are_rejected() {
        let (app, _) = app();
        seed_policy_versions(&app, &["1.0.0"]).await;

        let (status, body) = send(
            &app,
            "GET",
            "/policy/api/v1/policytypes/pt/versions/1.0.0/policies/p/versions?type=banana",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("\"latest\""));
        assert!(message.contains("\"deployed\""));
    }

    #[tokio::test]
    async fn missing_version_selectors_are_rejected() {
        let (app, _) = app();
        seed_policy_versions(&app, &["1.0.0"]).await;

        let (status, body) = send(
            &app,
            "GET",
            "/policy/api/v1/policytypes/pt/versions/1.0.0/policies/p/versions",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn guard_policies_round_trip() {
        let (app, _) = app();
        let (status, body) = send(
            &app,
            "POST",
            "/policy/api/v1/policytypes/onap.policies.controlloop.Guard/versions/1.0.0/policies",
            Some(serde_json::json!({
                "policy-id": "guard.minmax.scaling",
                "policy-version": "1",
                "content": { "min": "1", "max": "7" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["guard.minmax.scaling"]["type"], "guard.policy");

        let (status, body) = send(
            &app,
            "GET",
            "/policy/api/v1/policytypes/onap.policies.controlloop.Guard/versions/1.0.0/policies/guard.minmax.scaling?version=1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["guard.minmax.scaling"]["properties"]["max"], "7");
    }

    #[tokio::test]
    async fn deployed_guard_policies_are_keyed_by_pdp_group() {
        let (app, store) = app();
        let (status, _) = send(
            &app,
            "POST",
            "/policy/api/v1/policytypes/onap.policies.controlloop.Guard/versions/1.0.0/policies",
            Some(serde_json::json!({
                "policy-id": "guard.blacklist.b0",
                "policy-version": "1",
                "content": { "blacklist": "vnf-1" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        store
            .set_pdp_groups(vec![PdpGroup {
                name: "gA".to_string(),
                version: "1".to_string(),
                policies: vec![ConceptKey::new("guard.blacklist.b0", "1.0.0")],
                supported_policy_types: vec![ConceptKey::new(
                    "onap.policies.controlloop.guard.Blacklist",
                    "1.0.0",
                )],
            }])
            .await;

        let (status, body) = send(
            &app,
            "GET",
            "/policy/api/v1/policytypes/onap.policies.controlloop.Guard/versions/1.0.0/policies/guard.blacklist.b0/versions/deployed",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["gA:1"]["guard.blacklist.b0"]["properties"]["blacklist"],
            "vnf-1"
        );
    }

    #[tokio::test]
    async fn healthcheck_reports_alive() {
        let (app, _) = app();
        let (status, body) = send(&app, "GET", "/policy/api/v1/healthcheck", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Policy API");
        assert_eq!(body["url"], "self");
        assert_eq!(body["healthy"], true);
        assert_eq!(body["code"], 200);
        assert_eq!(body["message"], "alive");
    }

    #[tokio::test]
    async fn statistics_count_successes_and_failures() {
        let (app, _) = app();
        let (status, _) = send(&app, "GET", "/policy/api/v1/healthcheck", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(
            &app,
            "GET",
            "/policy/api/v1/policytypes/missing/versions/1.0.0",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, "GET", "/policy/api/v1/statistics", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 200);
        assert_eq!(body["total_api_call_count"], 2);
        assert_eq!(body["api_call_success_count"], 1);
        assert_eq!(body["api_call_failure_count"], 1);
        assert_eq!(body["total_policy_type_get_count"], 1);
    }

    #[tokio::test]
    async fn yaml_is_served_when_asked_for() {
        let (app, _) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/policy/api/v1/healthcheck")
                    .header(header::ACCEPT, "application/yaml")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/yaml"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_yaml::Value = serde_yaml::from_slice(&bytes).unwrap();
        assert_eq!(value["message"], serde_yaml::Value::from("alive"));
    }
}
