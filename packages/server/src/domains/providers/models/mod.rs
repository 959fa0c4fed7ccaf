pub mod provider;

pub use provider::{MonetizationState, OrderStatus, Provider, Review, SubscriptionStatus};
