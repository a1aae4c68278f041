//! Cache Module
//!
//! Provides the bounded, least-recently-used pod metadata cache.

mod bounded;
mod stats;
mod store;


// Re-export public types
pub use bounded::BoundedCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default maximum number of cached pods
pub const DEFAULT_MAX_ENTRIES: usize = 1000;
