//! Provider search: location-segment expansion, tiered match execution,
//! dedupe, and pagination.
//!
//! The pipeline is a pure read: validate the query, expand every requested
//! location into its progressively-truncated variants, run one repository
//! pass per variant and tier (paid tier first), union the passes in request
//! order, collapse duplicates keeping the first occurrence, then slice the
//! unique list by offset/limit.

use std::collections::HashSet;
use std::sync::Arc;

use crate::common::pagination::ValidatedPagination;
use crate::common::ApiError;
use crate::domains::providers::models::Provider;
use crate::kernel::{BaseProviderRepository, MatchTier};

/// A validated match request.
#[derive(Debug, Clone)]
pub struct MatchQuery {
    pub service_types: Vec<String>,
    pub service_area_pincodes: Vec<String>,
    pub page: ValidatedPagination,
}

/// One page of match results over the deduplicated candidate list.
#[derive(Debug, Clone)]
pub struct MatchPage {
    pub providers: Vec<Provider>,
    pub total_count: usize,
    pub has_more: bool,
}

/// Expand one free-form, comma-delimited location string into every
/// progressively-truncated-from-the-right variant, most specific first.
///
/// `"A, B, C"` yields `["A, B, C", "A, B", "A"]`; a string without commas
/// yields itself. Segments are trimmed and variants re-joined with `", "`,
/// so a provider registered at a coarser granularity (just the city, say)
/// is still found by a fully-qualified query.
pub fn expand_location_variants(location: &str) -> Vec<String> {
    let segments: Vec<&str> = location.split(',').map(str::trim).collect();

    (1..=segments.len())
        .rev()
        .map(|end| segments[..end].join(", "))
        .collect()
}

/// The search/ranking pipeline over an injected repository.
#[derive(Clone)]
pub struct ProviderMatcher {
    repository: Arc<dyn BaseProviderRepository>,
}

impl ProviderMatcher {
    pub fn new(repository: Arc<dyn BaseProviderRepository>) -> Self {
        Self { repository }
    }

    /// Category + location search.
    ///
    /// Passes run sequentially in variant order with the paid tier queried
    /// first within each variant, so the merged stream is deterministic and
    /// an active provider can never be displaced by a later unpaid match.
    pub async fn search(&self, query: &MatchQuery) -> Result<MatchPage, ApiError> {
        if query.service_types.is_empty() {
            return Err(ApiError::validation(
                "serviceTypes must be a non-empty array.",
            ));
        }
        if query.service_area_pincodes.is_empty() {
            return Err(ApiError::validation(
                "serviceAreaPincodes must be a non-empty array.",
            ));
        }

        let mut merged: Vec<Provider> = Vec::new();

        for location in &query.service_area_pincodes {
            for variant in expand_location_variants(location) {
                for tier in [MatchTier::Active, MatchTier::Other] {
                    let matches = self
                        .repository
                        .find_visible_by_category_and_location(
                            &query.service_types,
                            &variant,
                            tier,
                        )
                        .await?;
                    tracing::debug!(
                        variant = %variant,
                        ?tier,
                        matched = matches.len(),
                        "match pass"
                    );
                    merged.extend(matches);
                }
            }
        }

        self.paginate(merged, query.page)
    }

    /// Category-only search (no location filter), same tiering and paging.
    pub async fn search_all(
        &self,
        service_types: &[String],
        page: ValidatedPagination,
    ) -> Result<MatchPage, ApiError> {
        if service_types.is_empty() {
            return Err(ApiError::validation(
                "serviceTypes must be a non-empty array.",
            ));
        }

        let mut merged: Vec<Provider> = Vec::new();
        for tier in [MatchTier::Active, MatchTier::Other] {
            merged.extend(
                self.repository
                    .find_visible_by_category(service_types, tier)
                    .await?,
            );
        }

        self.paginate(merged, page)
    }

    /// Dedupe (first occurrence wins) and slice.
    ///
    /// Zero candidates is a NotFound, distinct from a valid empty page past
    /// the end of a non-empty result.
    fn paginate(
        &self,
        merged: Vec<Provider>,
        page: ValidatedPagination,
    ) -> Result<MatchPage, ApiError> {
        if merged.is_empty() {
            return Err(ApiError::not_found("No providers found"));
        }

        let mut seen = HashSet::new();
        let unique: Vec<Provider> = merged
            .into_iter()
            .filter(|provider| seen.insert(provider.unique_id))
            .collect();

        let total_count = unique.len();
        let has_more = page.has_more(total_count);
        let providers = page.slice(unique);

        Ok(MatchPage {
            providers,
            total_count,
            has_more,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::pagination::ValidatedPagination;
    use crate::kernel::test_dependencies::InMemoryProviderRepository;
    use crate::kernel::MatchTier;

    fn page(offset: usize, limit: usize) -> ValidatedPagination {
        ValidatedPagination { offset, limit }
    }

    fn query(locations: &[&str], page: ValidatedPagination) -> MatchQuery {
        MatchQuery {
            service_types: vec!["Plumbing".to_string()],
            service_area_pincodes: locations.iter().map(|s| s.to_string()).collect(),
            page,
        }
    }

    // ------------------------------------------------------------------
    // Location-segment expansion
    // ------------------------------------------------------------------

    #[test]
    fn expansion_yields_one_variant_per_segment() {
        let variants = expand_location_variants("Sector 5, Some Locality, Some City");
        assert_eq!(
            variants,
            vec!["Sector 5, Some Locality, Some City", "Sector 5, Some Locality", "Sector 5"]
        );
    }

    #[test]
    fn expansion_trims_segment_whitespace() {
        let variants = expand_location_variants("  A ,B ,  C");
        assert_eq!(variants, vec!["A, B, C", "A, B", "A"]);
    }

    #[test]
    fn expansion_of_single_segment_is_identity() {
        assert_eq!(expand_location_variants("110001"), vec!["110001"]);
    }

    #[test]
    fn expansion_count_matches_segment_count() {
        for n in 1..8 {
            let input = (0..n).map(|i| format!("S{i}")).collect::<Vec<_>>().join(", ");
            let variants = expand_location_variants(&input);
            assert_eq!(variants.len(), n);
            // strictly decreasing segment count, full string first
            assert_eq!(variants[0], input);
            for (i, v) in variants.iter().enumerate() {
                assert_eq!(v.split(", ").count(), n - i);
            }
        }
    }

    // ------------------------------------------------------------------
    // Match execution, dedupe, pagination
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn active_provider_precedes_inactive_on_coarser_variant() {
        // P1: order-active, registered at "A, B, C". P2: unpaid, at "A, B".
        let repo = Arc::new(
            InMemoryProviderRepository::new()
                .with_active_provider("P1", "p1@example.com", &["Plumbing"], &["A, B, C"])
                .with_provider("P2", "p2@example.com", &["Plumbing"], &["A, B"]),
        );
        let matcher = ProviderMatcher::new(repo);

        let result = matcher
            .search(&query(&["A, B, C"], page(0, 10)))
            .await
            .unwrap();

        let names: Vec<&str> = result
            .providers
            .iter()
            .map(|p| p.service_name.as_str())
            .collect();
        assert_eq!(names, vec!["P1", "P2"]);
        assert_eq!(result.total_count, 2);
        assert!(!result.has_more);
    }

    #[tokio::test]
    async fn offset_pagination_slices_the_deduped_list() {
        let repo = Arc::new(
            InMemoryProviderRepository::new()
                .with_active_provider("P1", "p1@example.com", &["Plumbing"], &["A, B, C"])
                .with_provider("P2", "p2@example.com", &["Plumbing"], &["A, B"]),
        );
        let matcher = ProviderMatcher::new(repo);

        let result = matcher
            .search(&query(&["A, B, C"], page(1, 1)))
            .await
            .unwrap();

        assert_eq!(result.providers.len(), 1);
        assert_eq!(result.providers[0].service_name, "P2");
        assert_eq!(result.total_count, 2);
        assert!(!result.has_more);
    }

    #[tokio::test]
    async fn duplicate_matches_collapse_to_first_occurrence() {
        // Registered at both granularities: matched by two variants, kept once.
        let repo = Arc::new(InMemoryProviderRepository::new().with_provider(
            "P1",
            "p1@example.com",
            &["Plumbing"],
            &["A, B", "A"],
        ));
        let matcher = ProviderMatcher::new(repo);

        let result = matcher.search(&query(&["A, B"], page(0, 10))).await.unwrap();

        assert_eq!(result.providers.len(), 1);
        assert_eq!(result.total_count, 1);
    }

    #[tokio::test]
    async fn active_duplicate_keeps_its_priority_position() {
        // P2 is active and registered at both "A, B" and "A": its first
        // occurrence (active tier of the first variant) wins, ahead of the
        // unpaid P1 even though P1 also matches the first variant.
        let repo = Arc::new(
            InMemoryProviderRepository::new()
                .with_provider("P1", "p1@example.com", &["Plumbing"], &["A, B"])
                .with_active_provider("P2", "p2@example.com", &["Plumbing"], &["A, B", "A"]),
        );
        let matcher = ProviderMatcher::new(repo);

        let result = matcher.search(&query(&["A, B"], page(0, 10))).await.unwrap();

        let names: Vec<&str> = result
            .providers
            .iter()
            .map(|p| p.service_name.as_str())
            .collect();
        assert_eq!(names, vec!["P2", "P1"]);
        assert_eq!(result.total_count, 2);
    }

    #[tokio::test]
    async fn no_two_results_share_an_identifier() {
        let repo = Arc::new(
            InMemoryProviderRepository::new()
                .with_provider("P1", "p1@example.com", &["Plumbing"], &["A, B, C", "A, B", "A"])
                .with_active_provider("P2", "p2@example.com", &["Plumbing"], &["A", "A, B"]),
        );
        let matcher = ProviderMatcher::new(repo);

        let result = matcher
            .search(&query(&["A, B, C", "A, B"], page(0, 50)))
            .await
            .unwrap();

        let mut ids = HashSet::new();
        for provider in &result.providers {
            assert!(ids.insert(provider.unique_id), "duplicate id in page");
        }
        assert_eq!(result.total_count, 2);
    }

    #[tokio::test]
    async fn offset_past_total_is_an_empty_page_not_an_error() {
        let repo = Arc::new(InMemoryProviderRepository::new().with_provider(
            "P1",
            "p1@example.com",
            &["Plumbing"],
            &["A"],
        ));
        let matcher = ProviderMatcher::new(repo);

        let result = matcher.search(&query(&["A"], page(5, 10))).await.unwrap();

        assert!(result.providers.is_empty());
        assert_eq!(result.total_count, 1);
        assert!(!result.has_more);
    }

    #[tokio::test]
    async fn repeated_identical_queries_return_identical_pages() {
        let repo = Arc::new(
            InMemoryProviderRepository::new()
                .with_active_provider("P1", "p1@example.com", &["Plumbing"], &["A, B"])
                .with_provider("P2", "p2@example.com", &["Plumbing"], &["A"])
                .with_provider("P3", "p3@example.com", &["Plumbing"], &["A, B"]),
        );
        let matcher = ProviderMatcher::new(repo);
        let q = query(&["A, B"], page(0, 2));

        let first = matcher.search(&q).await.unwrap();
        let second = matcher.search(&q).await.unwrap();

        let ids = |page: &MatchPage| {
            page.providers
                .iter()
                .map(|p| p.unique_id)
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(first.total_count, second.total_count);
        assert_eq!(first.has_more, second.has_more);
    }

    #[tokio::test]
    async fn zero_matches_is_not_found() {
        let repo = Arc::new(InMemoryProviderRepository::new());
        let matcher = ProviderMatcher::new(repo);

        let err = matcher
            .search(&query(&["Nowhere"], page(0, 10)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_service_types_is_rejected_before_any_repository_call() {
        let repo = Arc::new(InMemoryProviderRepository::new());
        let matcher = ProviderMatcher::new(repo.clone());

        let err = matcher
            .search(&MatchQuery {
                service_types: vec![],
                service_area_pincodes: vec!["A".to_string()],
                page: page(0, 10),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert!(repo.match_passes().is_empty());
    }

    #[tokio::test]
    async fn empty_locations_are_rejected_before_any_repository_call() {
        let repo = Arc::new(InMemoryProviderRepository::new());
        let matcher = ProviderMatcher::new(repo.clone());

        let err = matcher
            .search(&MatchQuery {
                service_types: vec!["Plumbing".to_string()],
                service_area_pincodes: vec![],
                page: page(0, 10),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert!(repo.match_passes().is_empty());
    }

    #[tokio::test]
    async fn category_match_is_case_insensitive_substring() {
        let repo = Arc::new(InMemoryProviderRepository::new().with_provider(
            "P1",
            "p1@example.com",
            &["Emergency Plumbing"],
            &["A"],
        ));
        let matcher = ProviderMatcher::new(repo);

        let result = matcher
            .search(&MatchQuery {
                service_types: vec!["plumb".to_string()],
                service_area_pincodes: vec!["A".to_string()],
                page: page(0, 10),
            })
            .await
            .unwrap();

        assert_eq!(result.total_count, 1);
    }

    #[tokio::test]
    async fn hidden_providers_never_match() {
        let repo = Arc::new(InMemoryProviderRepository::new().with_hidden_provider(
            "P1",
            "p1@example.com",
            &["Plumbing"],
            &["A"],
        ));
        let matcher = ProviderMatcher::new(repo);

        let err = matcher.search(&query(&["A"], page(0, 10))).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn repository_failure_surfaces_as_internal_error() {
        let repo = Arc::new(
            InMemoryProviderRepository::new().failing_with("connection reset"),
        );
        let matcher = ProviderMatcher::new(repo);

        let err = matcher.search(&query(&["A"], page(0, 10))).await.unwrap_err();
        assert!(matches!(err, ApiError::Repository(_)));
    }

    #[tokio::test]
    async fn tier_order_is_preserved_across_passes() {
        let repo = Arc::new(
            InMemoryProviderRepository::new()
                .with_provider("P1", "p1@example.com", &["Plumbing"], &["A"])
                .with_active_provider("P2", "p2@example.com", &["Plumbing"], &["A"]),
        );
        let matcher = ProviderMatcher::new(repo.clone());

        matcher.search(&query(&["A, B"], page(0, 10))).await.unwrap();

        // Two variants, each queried Active then Other.
        let tiers: Vec<MatchTier> = repo.match_passes().iter().map(|c| c.tier).collect();
        assert_eq!(
            tiers,
            vec![
                MatchTier::Active,
                MatchTier::Other,
                MatchTier::Active,
                MatchTier::Other
            ]
        );
        let locations: Vec<String> = repo
            .match_passes()
            .iter()
            .map(|c| c.location.clone())
            .collect();
        assert_eq!(locations, vec!["A, B", "A, B", "A", "A"]);
    }

    #[tokio::test]
    async fn search_all_ignores_location_but_keeps_tiering() {
        let repo = Arc::new(
            InMemoryProviderRepository::new()
                .with_provider("P1", "p1@example.com", &["Plumbing"], &["X"])
                .with_active_provider("P2", "p2@example.com", &["Plumbing"], &["Y"]),
        );
        let matcher = ProviderMatcher::new(repo);

        let result = matcher
            .search_all(&["Plumbing".to_string()], page(0, 10))
            .await
            .unwrap();

        let names: Vec<&str> = result
            .providers
            .iter()
            .map(|p| p.service_name.as_str())
            .collect();
        assert_eq!(names, vec!["P2", "P1"]);
    }
}
