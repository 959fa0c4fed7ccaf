//! Provider lookup endpoints.

use axum::extract::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::common::pagination::PaginationArgs;
use crate::common::ApiError;
use crate::domains::providers::{Provider, Review};
use crate::server::app::AxumAppState;
use crate::server::extract::ApiJson;

/// Default page size for review listings.
const DEFAULT_REVIEWS_LIMIT: usize = 10;

/// GET /visible-users
///
/// Every visible provider; 404 when the directory has none.
pub async fn visible_users_handler(
    Extension(state): Extension<AxumAppState>,
) -> Result<Json<Vec<Provider>>, ApiError> {
    let providers = state.deps.providers.find_visible().await?;
    if providers.is_empty() {
        return Err(ApiError::not_found("No visible providers found"));
    }
    Ok(Json(providers))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    pub personal_email: Option<String>,
}

/// POST /providers/lookup
///
/// Fetch one provider by email.
pub async fn lookup_handler(
    Extension(state): Extension<AxumAppState>,
    ApiJson(body): ApiJson<LookupRequest>,
) -> Result<Json<Provider>, ApiError> {
    let Some(email) = body.personal_email else {
        return Err(ApiError::validation("personalEmail is required."));
    };

    let provider = state
        .deps
        .providers
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::not_found("Provider not found"))?;

    Ok(Json(provider))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderReviewsRequest {
    pub personal_email: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderReviewsResponse {
    pub reviews: Vec<Review>,
    pub total: usize,
    pub has_more: bool,
}

/// POST /providers/reviews
///
/// A provider's reviews with offset/limit paging.
pub async fn provider_reviews_handler(
    Extension(state): Extension<AxumAppState>,
    ApiJson(body): ApiJson<ProviderReviewsRequest>,
) -> Result<Json<ProviderReviewsResponse>, ApiError> {
    let Some(email) = body.personal_email else {
        return Err(ApiError::validation("personalEmail is required."));
    };

    let page = PaginationArgs {
        offset: body.offset,
        limit: body.limit,
    }
    .validate(DEFAULT_REVIEWS_LIMIT)
    .map_err(ApiError::validation)?;

    let provider = state
        .deps
        .providers
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::not_found("Provider not found"))?;

    let total = provider.reviews.len();
    let has_more = page.has_more(total);
    let reviews = page.slice(provider.reviews);

    Ok(Json(ProviderReviewsResponse {
        reviews,
        total,
        has_more,
    }))
}
