//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod engine;
mod entry;
pub mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use engine::{CacheEngine, EngineConfig, SweeperState, DEFAULT_CAPACITY, DEFAULT_SWEEP_INTERVAL};
pub use entry::CacheEntry;
pub use lru::RecencyList;
pub use stats::CacheStats;
pub use store::CacheStore;
