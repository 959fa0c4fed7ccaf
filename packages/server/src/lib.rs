// Provider Directory - API Core
//
// This crate provides the backend API for the service-provider directory:
// category/location search with paid-tier ranking, review aggregation, and
// the thin JSON surface around them. Storage is reached exclusively through
// the repository trait in `kernel` - handlers never touch the store directly.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
