#![allow(dead_code)]

// Common test utilities
//
// Builds the real router over the in-memory repository and drives it
// in-process, so the suites exercise the full extract/validate/match
// pipeline without a database.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use directory_core::kernel::{InMemoryProviderRepository, ServerDeps};
use directory_core::server::build_app;

/// Router wired to the given repository with a short request timeout.
pub fn test_app(repository: Arc<InMemoryProviderRepository>) -> Router {
    build_app(
        Arc::new(ServerDeps::new(repository)),
        Duration::from_secs(5),
    )
}

/// Send a JSON body and collect the JSON response.
pub async fn send_json(
    app: &Router,
    method: Method,
    path: &str,
    body: Value,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    read_response(app.clone().oneshot(request).await.unwrap()).await
}

/// Send a body-less GET and collect the JSON response.
pub async fn send_get(app: &Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();

    read_response(app.clone().oneshot(request).await.unwrap()).await
}

async fn read_response(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Names of the providers in a search response, in page order.
pub fn user_names(body: &Value) -> Vec<String> {
    body["users"]
        .as_array()
        .map(|users| {
            users
                .iter()
                .map(|u| u["serviceName"].as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}
