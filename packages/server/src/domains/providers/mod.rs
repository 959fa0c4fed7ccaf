//! Provider domain: the search/ranking pipeline and review aggregation.

pub mod matcher;
pub mod models;
pub mod reviews;

pub use matcher::{expand_location_variants, MatchPage, MatchQuery, ProviderMatcher};
pub use models::{MonetizationState, OrderStatus, Provider, Review, SubscriptionStatus};
pub use reviews::{NewReview, ProviderRef, ReviewService};
