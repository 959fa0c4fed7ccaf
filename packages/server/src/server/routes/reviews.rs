//! Review submission.

use axum::extract::Extension;
use axum::Json;
use serde::Deserialize;

use crate::common::{ApiError, ProviderId};
use crate::domains::providers::{NewReview, Provider, ProviderRef, ReviewService};
use crate::server::app::AxumAppState;
use crate::server::extract::ApiJson;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewsRequest {
    pub personal_email: Option<String>,
    pub unique_id: Option<String>,
    pub reviewer_name: Option<String>,
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

/// PUT /update/reviews
///
/// Append one review, increment the count, and recompute the average
/// rating. The provider is addressed by email or by unique id.
pub async fn update_reviews_handler(
    Extension(state): Extension<AxumAppState>,
    ApiJson(body): ApiJson<UpdateReviewsRequest>,
) -> Result<Json<Provider>, ApiError> {
    let target = provider_ref(body.personal_email, body.unique_id)?;

    let (Some(reviewer_name), Some(rating), Some(comment)) =
        (body.reviewer_name, body.rating, body.comment)
    else {
        return Err(ApiError::validation(
            "reviewerName, rating, and comment are required.",
        ));
    };

    let service = ReviewService::new(state.deps.providers.clone());
    let provider = service
        .append_review(
            &target,
            NewReview {
                reviewer_name,
                rating,
                comment,
            },
        )
        .await?;

    Ok(Json(provider))
}

/// Resolve the email-or-id addressing; email wins when both are present.
pub(crate) fn provider_ref(
    personal_email: Option<String>,
    unique_id: Option<String>,
) -> Result<ProviderRef, ApiError> {
    if let Some(email) = personal_email {
        return Ok(ProviderRef::Email(email));
    }
    match unique_id {
        Some(raw) => {
            let id = ProviderId::parse(&raw)
                .map_err(|_| ApiError::validation("uniqueId must be a valid id."))?;
            Ok(ProviderRef::UniqueId(id))
        }
        None => Err(ApiError::validation(
            "personalEmail or uniqueId is required.",
        )),
    }
}
