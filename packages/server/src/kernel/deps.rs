//! Server dependencies (using traits for testability)
//!
//! The central dependency container handed to the HTTP layer. Storage is
//! reached only through the repository trait, so tests swap in the
//! in-memory implementation and production wires up Postgres.

use std::sync::Arc;

use crate::kernel::traits::BaseProviderRepository;

/// Dependencies accessible to request handlers.
#[derive(Clone)]
pub struct ServerDeps {
    pub providers: Arc<dyn BaseProviderRepository>,
}

impl ServerDeps {
    pub fn new(providers: Arc<dyn BaseProviderRepository>) -> Self {
        Self { providers }
    }
}
