// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like the match pipeline) lives in domain services that
// consume these traits.
//
// Naming convention: Base* for trait names (e.g., BaseProviderRepository)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::ProviderId;
use crate::domains::providers::models::{Provider, Review};

// =============================================================================
// Provider Repository Trait (Infrastructure - storage boundary)
// =============================================================================

/// Priority tier requested from a match pass.
///
/// `Active` selects visible providers currently monetized (active
/// subscription or active one-time order); `Other` selects the visible
/// remainder. The matcher always queries `Active` before `Other` so the
/// merged stream keeps paid listings first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Active,
    Other,
}

/// Partial update applied through `update_fields`.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProviderChanges {
    pub service_area_pincodes: Option<Vec<String>>,
    pub visible: Option<bool>,
}

#[async_trait]
pub trait BaseProviderRepository: Send + Sync {
    /// Cheap liveness probe for the health endpoint.
    async fn ping(&self) -> Result<()>;

    /// One match pass: visible providers in `tier` whose category set
    /// intersects `category_patterns` (case-insensitive substring match per
    /// pattern) and whose location-tag set contains `location_exact`.
    async fn find_visible_by_category_and_location(
        &self,
        category_patterns: &[String],
        location_exact: &str,
        tier: MatchTier,
    ) -> Result<Vec<Provider>>;

    /// Category-only match pass (no location filter), same tier semantics.
    async fn find_visible_by_category(
        &self,
        category_patterns: &[String],
        tier: MatchTier,
    ) -> Result<Vec<Provider>>;

    /// All visible providers.
    async fn find_visible(&self) -> Result<Vec<Provider>>;

    async fn find_by_id(&self, id: ProviderId) -> Result<Option<Provider>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Provider>>;

    /// Apply a partial profile update. Returns the updated provider, or
    /// `None` if no provider has this id.
    async fn update_fields(
        &self,
        id: ProviderId,
        changes: ProviderChanges,
    ) -> Result<Option<Provider>>;

    /// Conditionally replace the review aggregate: the write only lands if
    /// the stored `reviews_count` still equals `expected_count` (optimistic
    /// concurrency). Returns the updated provider, or `None` when the
    /// guard failed - the caller re-reads and retries.
    async fn replace_reviews_if_count(
        &self,
        id: ProviderId,
        expected_count: i32,
        reviews: &[Review],
        reviews_count: i32,
        rating: f64,
    ) -> Result<Option<Provider>>;
}
