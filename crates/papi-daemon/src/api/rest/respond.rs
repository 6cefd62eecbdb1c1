//! Response content negotiation
//!
//! JSON is the default wire format; clients asking for `application/yaml`
//! in `Accept` get the same payload rendered by `serde_yaml`.

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Render a payload as JSON or YAML depending on the `Accept` header
pub fn negotiate<T: Serialize>(headers: &HeaderMap, value: T) -> Response {
    if wants_yaml(headers) {
        match serde_yaml::to_string(&value) {
            Ok(body) => (
                [(header::CONTENT_TYPE, "application/yaml")],
                body,
            )
                .into_response(),
            Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
        }
    } else {
        Json(value).into_response()
    }
}

fn wants_yaml(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn json_is_the_default() {
        let response = negotiate(&HeaderMap::new(), serde_json::json!({"a": 1}));
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            HeaderValue::from_static("application/json")
        );
    }

    #[test]
    fn yaml_is_served_on_request() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/yaml"));
        let response = negotiate(&headers, serde_json::json!({"a": 1}));
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            HeaderValue::from_static("application/yaml")
        );
    }
}
