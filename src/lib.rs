//! lru_kv - A thread-safe in-memory key/value cache
//!
//! Bounded by entry count with least-recently-used eviction. Entries may
//! carry a time-to-live and are expired both lazily on read and by a
//! background sweep. The engine can be embedded directly, served over HTTP,
//! or reached through the bundled client.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheEngine, EngineConfig};
pub use client::CacheClient;
pub use config::Config;
