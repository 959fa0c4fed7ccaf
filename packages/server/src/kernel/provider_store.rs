//! Postgres-backed provider repository.
//!
//! Owns all SQL for the providers table. Category matching is `ILIKE ANY`
//! over the unnested tag array (wildcards in the requested patterns are
//! escaped), location matching is exact array membership, and the review
//! aggregate is replaced with a single conditional UPDATE so the
//! compare-and-swap is one atomic statement.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::common::ProviderId;
use crate::domains::providers::models::{
    MonetizationState, OrderStatus, Provider, Review, SubscriptionStatus,
};
use crate::kernel::traits::{BaseProviderRepository, MatchTier, ProviderChanges};

const SELECT_COLUMNS: &str = "id, service_name, owner_name, phone, email, about, address, \
     service_types, service_area_pincodes, visible, subscription_id, subscription_plan, \
     subscription_status, order_id, order_status, rating, reviews_count, reviews, \
     created_at, updated_at";

/// Flat row shape; folded into the domain struct by `into_provider`.
#[derive(sqlx::FromRow)]
struct ProviderRow {
    id: ProviderId,
    service_name: String,
    owner_name: Option<String>,
    phone: Option<String>,
    email: String,
    about: Option<String>,
    address: Option<String>,
    service_types: Vec<String>,
    service_area_pincodes: Vec<String>,
    visible: bool,
    subscription_id: Option<String>,
    subscription_plan: Option<String>,
    subscription_status: Option<String>,
    order_id: Option<String>,
    order_status: Option<String>,
    rating: f64,
    reviews_count: i32,
    reviews: Json<Vec<Review>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProviderRow {
    fn into_provider(self) -> Provider {
        // At most one monetization path is populated; a subscription row
        // shadows a stale order row if both somehow exist.
        let monetization = if let Some(subscription_id) = self.subscription_id {
            MonetizationState::Subscription {
                subscription_id,
                plan: self.subscription_plan.unwrap_or_default(),
                status: SubscriptionStatus::from_db(
                    self.subscription_status.as_deref().unwrap_or(""),
                ),
            }
        } else if let Some(order_id) = self.order_id {
            MonetizationState::OneTimeOrder {
                order_id,
                status: OrderStatus::from_db(self.order_status.as_deref().unwrap_or("")),
            }
        } else {
            MonetizationState::None
        };

        Provider {
            unique_id: self.id,
            service_name: self.service_name,
            owner_name: self.owner_name,
            phone: self.phone,
            email: self.email,
            about: self.about,
            address: self.address,
            service_types: self.service_types,
            service_area_pincodes: self.service_area_pincodes,
            visible: self.visible,
            monetization,
            rating: self.rating,
            reviews_count: self.reviews_count,
            reviews: self.reviews.0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Escape LIKE wildcards so request input matches literally.
fn like_pattern(category: &str) -> String {
    let escaped = category
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn tier_predicate(tier: MatchTier) -> &'static str {
    match tier {
        MatchTier::Active => "(subscription_status = 'active' OR order_status = 'active')",
        MatchTier::Other => {
            "(subscription_status IS DISTINCT FROM 'active' \
             AND order_status IS DISTINCT FROM 'active')"
        }
    }
}

pub struct PostgresProviderRepository {
    pool: PgPool,
}

impl PostgresProviderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseProviderRepository for PostgresProviderRepository {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_visible_by_category_and_location(
        &self,
        category_patterns: &[String],
        location_exact: &str,
        tier: MatchTier,
    ) -> Result<Vec<Provider>> {
        let patterns: Vec<String> = category_patterns.iter().map(|c| like_pattern(c)).collect();
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM providers \
             WHERE visible \
               AND EXISTS (SELECT 1 FROM unnest(service_types) AS tag WHERE tag ILIKE ANY($1)) \
               AND $2 = ANY(service_area_pincodes) \
               AND {} \
             ORDER BY created_at, id",
            tier_predicate(tier)
        );

        let rows = sqlx::query_as::<_, ProviderRow>(&sql)
            .bind(&patterns)
            .bind(location_exact)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ProviderRow::into_provider).collect())
    }

    async fn find_visible_by_category(
        &self,
        category_patterns: &[String],
        tier: MatchTier,
    ) -> Result<Vec<Provider>> {
        let patterns: Vec<String> = category_patterns.iter().map(|c| like_pattern(c)).collect();
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM providers \
             WHERE visible \
               AND EXISTS (SELECT 1 FROM unnest(service_types) AS tag WHERE tag ILIKE ANY($1)) \
               AND {} \
             ORDER BY created_at, id",
            tier_predicate(tier)
        );

        let rows = sqlx::query_as::<_, ProviderRow>(&sql)
            .bind(&patterns)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ProviderRow::into_provider).collect())
    }

    async fn find_visible(&self) -> Result<Vec<Provider>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM providers WHERE visible ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, ProviderRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ProviderRow::into_provider).collect())
    }

    async fn find_by_id(&self, id: ProviderId) -> Result<Option<Provider>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM providers WHERE id = $1");
        let row = sqlx::query_as::<_, ProviderRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ProviderRow::into_provider))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Provider>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM providers WHERE email = $1");
        let row = sqlx::query_as::<_, ProviderRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ProviderRow::into_provider))
    }

    async fn update_fields(
        &self,
        id: ProviderId,
        changes: ProviderChanges,
    ) -> Result<Option<Provider>> {
        let sql = format!(
            "UPDATE providers SET \
               service_area_pincodes = COALESCE($2, service_area_pincodes), \
               visible = COALESCE($3, visible), \
               updated_at = now() \
             WHERE id = $1 \
             RETURNING {SELECT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProviderRow>(&sql)
            .bind(id)
            .bind(changes.service_area_pincodes)
            .bind(changes.visible)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ProviderRow::into_provider))
    }

    async fn replace_reviews_if_count(
        &self,
        id: ProviderId,
        expected_count: i32,
        reviews: &[Review],
        reviews_count: i32,
        rating: f64,
    ) -> Result<Option<Provider>> {
        // Single conditional UPDATE: the count guard and the write are one
        // atomic statement, so a concurrent append cannot be overwritten.
        let sql = format!(
            "UPDATE providers SET \
               reviews = $3, \
               reviews_count = $4, \
               rating = $5, \
               updated_at = now() \
             WHERE id = $1 AND reviews_count = $2 \
             RETURNING {SELECT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProviderRow>(&sql)
            .bind(id)
            .bind(expected_count)
            .bind(Json(reviews))
            .bind(reviews_count)
            .bind(rating)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ProviderRow::into_provider))
    }
}
