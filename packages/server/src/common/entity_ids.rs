//! Typed ID definitions for domain entities.
//!
//! Type aliases over `Id<T>` give compile-time safety for ID usage
//! throughout the application.

// Re-export the core Id type and version markers
pub use super::id::{Id, V4, V7};

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Provider entities (business/service listings).
pub struct Provider;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for Provider entities.
pub type ProviderId = Id<Provider>;
