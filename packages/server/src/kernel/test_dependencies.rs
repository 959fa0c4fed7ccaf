// InMemoryProviderRepository - mock storage for testing
//
// Replicates the repository's matching semantics over a Vec of providers
// and records every match pass so tests can assert which passes ran (or
// that none did).

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};

use crate::common::ProviderId;
use crate::domains::providers::models::{
    MonetizationState, OrderStatus, Provider, Review,
};
use crate::kernel::traits::{BaseProviderRepository, MatchTier, ProviderChanges};

/// Arguments captured from one match pass.
#[derive(Debug, Clone)]
pub struct MatchPassArgs {
    pub categories: Vec<String>,
    pub location: String,
    pub tier: MatchTier,
}

pub struct InMemoryProviderRepository {
    providers: Arc<Mutex<Vec<Provider>>>,
    match_passes: Arc<Mutex<Vec<MatchPassArgs>>>,
    /// When set, every query fails with this message.
    failure: Arc<Mutex<Option<String>>>,
    /// Remaining review CAS writes to reject as lost races.
    review_conflicts: Arc<Mutex<u32>>,
}

impl InMemoryProviderRepository {
    pub fn new() -> Self {
        Self {
            providers: Arc::new(Mutex::new(Vec::new())),
            match_passes: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            review_conflicts: Arc::new(Mutex::new(0)),
        }
    }

    fn build_provider(
        service_name: &str,
        email: &str,
        service_types: &[&str],
        pincodes: &[&str],
        visible: bool,
        monetization: MonetizationState,
    ) -> Provider {
        let now = Utc::now();
        Provider {
            unique_id: ProviderId::new(),
            service_name: service_name.to_string(),
            owner_name: None,
            phone: None,
            email: email.to_string(),
            about: None,
            address: None,
            service_types: service_types.iter().map(|s| s.to_string()).collect(),
            service_area_pincodes: pincodes.iter().map(|s| s.to_string()).collect(),
            visible,
            monetization,
            rating: 0.0,
            reviews_count: 0,
            reviews: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a visible, unmonetized provider.
    pub fn with_provider(
        self,
        service_name: &str,
        email: &str,
        service_types: &[&str],
        pincodes: &[&str],
    ) -> Self {
        let provider = Self::build_provider(
            service_name,
            email,
            service_types,
            pincodes,
            true,
            MonetizationState::None,
        );
        self.providers.lock().unwrap().push(provider);
        self
    }

    /// Add a visible provider with an active one-time order.
    pub fn with_active_provider(
        self,
        service_name: &str,
        email: &str,
        service_types: &[&str],
        pincodes: &[&str],
    ) -> Self {
        let provider = Self::build_provider(
            service_name,
            email,
            service_types,
            pincodes,
            true,
            MonetizationState::OneTimeOrder {
                order_id: format!("order-{service_name}"),
                status: OrderStatus::Active,
            },
        );
        self.providers.lock().unwrap().push(provider);
        self
    }

    /// Add a provider with the visibility flag off.
    pub fn with_hidden_provider(
        self,
        service_name: &str,
        email: &str,
        service_types: &[&str],
        pincodes: &[&str],
    ) -> Self {
        let provider = Self::build_provider(
            service_name,
            email,
            service_types,
            pincodes,
            false,
            MonetizationState::None,
        );
        self.providers.lock().unwrap().push(provider);
        self
    }

    /// Make every subsequent query fail.
    pub fn failing_with(self, message: &str) -> Self {
        *self.failure.lock().unwrap() = Some(message.to_string());
        self
    }

    /// Reject the next `n` review CAS writes as lost races.
    pub fn with_review_conflicts(self, n: u32) -> Self {
        *self.review_conflicts.lock().unwrap() = n;
        self
    }

    /// Every match pass that has been issued.
    pub fn match_passes(&self) -> Vec<MatchPassArgs> {
        self.match_passes.lock().unwrap().clone()
    }

    /// Snapshot of the stored providers.
    pub fn providers(&self) -> Vec<Provider> {
        self.providers.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<()> {
        if let Some(message) = self.failure.lock().unwrap().as_ref() {
            return Err(anyhow!("{message}"));
        }
        Ok(())
    }

    fn matches_categories(provider: &Provider, patterns: &[String]) -> bool {
        provider.service_types.iter().any(|tag| {
            let tag = tag.to_lowercase();
            patterns
                .iter()
                .any(|pattern| tag.contains(&pattern.to_lowercase()))
        })
    }

    fn matches_tier(provider: &Provider, tier: MatchTier) -> bool {
        match tier {
            MatchTier::Active => provider.is_active(),
            MatchTier::Other => !provider.is_active(),
        }
    }
}

impl Default for InMemoryProviderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseProviderRepository for InMemoryProviderRepository {
    async fn ping(&self) -> Result<()> {
        self.check_failure()
    }

    async fn find_visible_by_category_and_location(
        &self,
        category_patterns: &[String],
        location_exact: &str,
        tier: MatchTier,
    ) -> Result<Vec<Provider>> {
        self.match_passes.lock().unwrap().push(MatchPassArgs {
            categories: category_patterns.to_vec(),
            location: location_exact.to_string(),
            tier,
        });
        self.check_failure()?;

        Ok(self
            .providers
            .lock()
            .unwrap()
            .iter()
            .filter(|p| {
                p.visible
                    && Self::matches_tier(p, tier)
                    && Self::matches_categories(p, category_patterns)
                    && p.service_area_pincodes
                        .iter()
                        .any(|tag| tag == location_exact)
            })
            .cloned()
            .collect())
    }

    async fn find_visible_by_category(
        &self,
        category_patterns: &[String],
        tier: MatchTier,
    ) -> Result<Vec<Provider>> {
        self.check_failure()?;

        Ok(self
            .providers
            .lock()
            .unwrap()
            .iter()
            .filter(|p| {
                p.visible
                    && Self::matches_tier(p, tier)
                    && Self::matches_categories(p, category_patterns)
            })
            .cloned()
            .collect())
    }

    async fn find_visible(&self) -> Result<Vec<Provider>> {
        self.check_failure()?;
        Ok(self
            .providers
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.visible)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: ProviderId) -> Result<Option<Provider>> {
        self.check_failure()?;
        Ok(self
            .providers
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.unique_id == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Provider>> {
        self.check_failure()?;
        Ok(self
            .providers
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.email == email)
            .cloned())
    }

    async fn update_fields(
        &self,
        id: ProviderId,
        changes: ProviderChanges,
    ) -> Result<Option<Provider>> {
        self.check_failure()?;
        let mut providers = self.providers.lock().unwrap();
        let Some(provider) = providers.iter_mut().find(|p| p.unique_id == id) else {
            return Ok(None);
        };

        if let Some(pincodes) = changes.service_area_pincodes {
            provider.service_area_pincodes = pincodes;
        }
        if let Some(visible) = changes.visible {
            provider.visible = visible;
        }
        provider.updated_at = Utc::now();

        Ok(Some(provider.clone()))
    }

    async fn replace_reviews_if_count(
        &self,
        id: ProviderId,
        expected_count: i32,
        reviews: &[Review],
        reviews_count: i32,
        rating: f64,
    ) -> Result<Option<Provider>> {
        self.check_failure()?;

        {
            let mut conflicts = self.review_conflicts.lock().unwrap();
            if *conflicts > 0 {
                *conflicts -= 1;
                return Ok(None);
            }
        }

        let mut providers = self.providers.lock().unwrap();
        let Some(provider) = providers.iter_mut().find(|p| p.unique_id == id) else {
            return Ok(None);
        };
        if provider.reviews_count != expected_count {
            return Ok(None);
        }

        provider.reviews = reviews.to_vec();
        provider.reviews_count = reviews_count;
        provider.rating = rating;
        provider.updated_at = Utc::now();

        Ok(Some(provider.clone()))
    }
}
