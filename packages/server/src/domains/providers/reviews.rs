//! Review aggregation: append one review atomically with count/average
//! update.
//!
//! The append is a read-modify-write guarded by an optimistic
//! compare-and-swap on `reviews_count`. Two concurrent submissions for the
//! same provider both land: the loser of the race re-reads and retries, so
//! both reviews end up in the final count and average.

use std::sync::Arc;

use chrono::Utc;

use crate::common::{ApiError, ProviderId};
use crate::domains::providers::models::{Provider, Review};
use crate::kernel::BaseProviderRepository;

/// How often the compare-and-swap is retried before giving up.
const MAX_APPEND_ATTEMPTS: u32 = 3;

/// How a request identifies the provider being reviewed.
#[derive(Debug, Clone)]
pub enum ProviderRef {
    Email(String),
    UniqueId(ProviderId),
}

/// A validated incoming review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub reviewer_name: String,
    pub rating: f64,
    pub comment: String,
}

impl NewReview {
    fn validate(&self) -> Result<(), ApiError> {
        if self.reviewer_name.trim().is_empty() {
            return Err(ApiError::validation("reviewerName is required."));
        }
        if self.comment.trim().is_empty() {
            return Err(ApiError::validation("comment is required."));
        }
        if !self.rating.is_finite() || !(0.0..=5.0).contains(&self.rating) {
            return Err(ApiError::validation("rating must be a number from 0 to 5."));
        }
        Ok(())
    }
}

/// Appends reviews through the repository boundary.
#[derive(Clone)]
pub struct ReviewService {
    repository: Arc<dyn BaseProviderRepository>,
}

impl ReviewService {
    pub fn new(repository: Arc<dyn BaseProviderRepository>) -> Self {
        Self { repository }
    }

    async fn find(&self, target: &ProviderRef) -> Result<Option<Provider>, ApiError> {
        let provider = match target {
            ProviderRef::Email(email) => self.repository.find_by_email(email).await?,
            ProviderRef::UniqueId(id) => self.repository.find_by_id(*id).await?,
        };
        Ok(provider)
    }

    /// Append `review` to the provider identified by `target`.
    ///
    /// The count goes up by exactly one and the average is recomputed over
    /// every rating. Lost races are retried up to `MAX_APPEND_ATTEMPTS`
    /// times before surfacing a concurrency error.
    pub async fn append_review(
        &self,
        target: &ProviderRef,
        review: NewReview,
    ) -> Result<Provider, ApiError> {
        review.validate()?;

        let stored = Review {
            reviewer_name: review.reviewer_name,
            rating: review.rating,
            comment: review.comment,
            date: Utc::now(),
        };

        for attempt in 1..=MAX_APPEND_ATTEMPTS {
            let provider = self
                .find(target)
                .await?
                .ok_or_else(|| ApiError::not_found("Provider not found"))?;

            let (reviews, count, rating) = provider.appended_reviews(stored.clone());

            let updated = self
                .repository
                .replace_reviews_if_count(
                    provider.unique_id,
                    provider.reviews_count,
                    &reviews,
                    count,
                    rating,
                )
                .await?;

            match updated {
                Some(provider) => return Ok(provider),
                None => {
                    tracing::warn!(
                        provider_id = %provider.unique_id,
                        attempt,
                        "review append lost an optimistic race, retrying"
                    );
                }
            }
        }

        Err(ApiError::Concurrency(format!(
            "review could not be appended after {MAX_APPEND_ATTEMPTS} attempts"
        )))
    }
}
