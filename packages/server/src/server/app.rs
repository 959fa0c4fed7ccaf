//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::Extension;
use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    health_handler, lookup_handler, provider_reviews_handler, search_all_handler, search_handler,
    update_pincodes_handler, update_reviews_handler, update_visibility_handler,
    visible_users_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: Arc<ServerDeps>,
}

/// Build the Axum application router
///
/// All storage access flows through the repository in `deps`; the timeout
/// layer aborts requests that run too long so partial results are never
/// returned.
pub fn build_app(deps: Arc<ServerDeps>, request_timeout: Duration) -> Router {
    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        // Search
        .route("/search", post(search_handler))
        .route("/search-all", post(search_all_handler))
        // Provider lookups
        .route("/visible-users", get(visible_users_handler))
        .route("/providers/lookup", post(lookup_handler))
        .route("/providers/reviews", post(provider_reviews_handler))
        // Mutations
        .route("/update/reviews", put(update_reviews_handler))
        .route("/update/pincodes", put(update_pincodes_handler))
        .route("/update/visibility", put(update_visibility_handler))
        // Health check (no timeout concerns of its own; the ping is bounded)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(AxumAppState { deps }))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
