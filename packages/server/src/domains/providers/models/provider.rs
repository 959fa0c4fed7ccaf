use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::ProviderId;

/// A business/service listing.
///
/// Only visible providers participate in matching; `monetization` carries
/// the paid-tier signal that ranks them ahead of unpaid listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub unique_id: ProviderId,
    pub service_name: String,
    pub owner_name: Option<String>,
    pub phone: Option<String>,
    pub email: String,
    pub about: Option<String>,
    pub address: Option<String>,
    /// Category tags, matched case-insensitively with substring semantics.
    pub service_types: Vec<String>,
    /// Free-form comma-delimited location tags ("service-area pincodes"),
    /// e.g. `"110001, Some Locality, Some City"`.
    pub service_area_pincodes: Vec<String>,
    pub visible: bool,
    pub monetization: MonetizationState,
    /// Arithmetic mean of all review ratings, 0-5.
    pub rating: f64,
    pub reviews_count: i32,
    pub reviews: Vec<Review>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Provider {
    /// Whether the provider currently holds an active paid subscription or
    /// an active one-time order. Active providers rank ahead of the rest.
    pub fn is_active(&self) -> bool {
        self.monetization.is_active()
    }

    /// The review list, count, and average after appending `review`.
    ///
    /// The average is recomputed as the mean over every rating including the
    /// new one, never updated incrementally, so floating-point drift does
    /// not accumulate across appends.
    pub fn appended_reviews(&self, review: Review) -> (Vec<Review>, i32, f64) {
        let mut reviews = self.reviews.clone();
        reviews.push(review);

        let sum: f64 = reviews.iter().map(|r| r.rating).sum();
        let average = sum / reviews.len() as f64;
        let count = reviews.len() as i32;

        (reviews, count, average)
    }
}

/// A single customer review embedded in a provider record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub reviewer_name: String,
    /// Rating in [0, 5].
    pub rating: f64,
    pub comment: String,
    pub date: DateTime<Utc>,
}

/// Monetization state of a provider.
///
/// A provider is monetized through at most one path at a time; modelling the
/// two paths as variants makes "both simultaneously active" unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MonetizationState {
    None,
    #[serde(rename_all = "camelCase")]
    Subscription {
        subscription_id: String,
        plan: String,
        status: SubscriptionStatus,
    },
    #[serde(rename_all = "camelCase")]
    OneTimeOrder {
        order_id: String,
        status: OrderStatus,
    },
}

impl MonetizationState {
    pub fn is_active(&self) -> bool {
        match self {
            MonetizationState::None => false,
            MonetizationState::Subscription { status, .. } => {
                *status == SubscriptionStatus::Active
            }
            MonetizationState::OneTimeOrder { status, .. } => *status == OrderStatus::Active,
        }
    }
}

/// Lifecycle states of a recurring subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Canceled,
    Expired,
    Failed,
}

impl SubscriptionStatus {
    /// Parse the status column value; unknown values read as `Failed`.
    pub fn from_db(value: &str) -> Self {
        match value {
            "active" => SubscriptionStatus::Active,
            "canceled" => SubscriptionStatus::Canceled,
            "expired" => SubscriptionStatus::Expired,
            _ => SubscriptionStatus::Failed,
        }
    }
}

/// Lifecycle states of a one-time purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Active,
    Expired,
}

impl OrderStatus {
    /// Parse the status column value; unknown values read as `Expired`.
    pub fn from_db(value: &str) -> Self {
        match value {
            "created" => OrderStatus::Created,
            "active" => OrderStatus::Active,
            _ => OrderStatus::Expired,
        }
    }
}
