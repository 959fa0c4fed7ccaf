//! API error taxonomy.
//!
//! Every fallible operation surfaces one of these kinds; handlers convert
//! them into the `{ "message": ... }` bodies the clients expect. Repository
//! failures are logged server-side and never leak their internals.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the directory API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing request input. Never retried.
    #[error("{0}")]
    Validation(String),

    /// No provider matched, or a referenced provider does not exist.
    /// Distinct from an empty page past the end of a non-empty result.
    #[error("{0}")]
    NotFound(String),

    /// A lost update was detected repeatedly during a read-modify-write;
    /// the bounded retry loop gave up.
    #[error("{0}")]
    Concurrency(String),

    /// Underlying storage failure. Not retried by the caller.
    #[error("repository error: {0}")]
    Repository(anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Repository(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Concurrency(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::Repository(err) => {
                tracing::error!(error = ?err, "repository failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error".to_string())
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
