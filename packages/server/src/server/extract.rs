//! Request-body extraction.
//!
//! `ApiJson<T>` wraps `axum::Json` so that malformed bodies - wrong JSON
//! types, syntax errors, missing content type - surface as 400
//! ValidationErrors in the API's `{ "message": ... }` shape instead of
//! axum's default 422 rejection.

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::common::ApiError;

pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError::validation(rejection.body_text())),
        }
    }
}
