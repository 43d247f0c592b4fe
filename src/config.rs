//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::EngineConfig;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold, always >= 1
    pub capacity: usize,
    /// Background expiry sweep interval in milliseconds
    pub sweep_interval_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Per-request deadline in milliseconds
    pub request_timeout_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries, values <= 0 become 1 (default: 1000)
    /// - `SWEEP_INTERVAL_MS` - Expiry sweep frequency in ms (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `REQUEST_TIMEOUT_MS` - Per-request deadline in ms (default: 5000)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable source. Missing or
    /// unparseable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            capacity: parse_var::<i64, _>(&lookup, "CACHE_CAPACITY")
                .map(coerce_capacity)
                .unwrap_or(defaults.capacity),
            sweep_interval_ms: parse_var(&lookup, "SWEEP_INTERVAL_MS")
                .unwrap_or(defaults.sweep_interval_ms),
            server_port: parse_var(&lookup, "SERVER_PORT").unwrap_or(defaults.server_port),
            request_timeout_ms: parse_var(&lookup, "REQUEST_TIMEOUT_MS")
                .unwrap_or(defaults.request_timeout_ms),
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Engine parameters derived from this configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.capacity).with_sweep_interval(self.sweep_interval())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            sweep_interval_ms: 1000,
            server_port: 3000,
            request_timeout_ms: 5000,
        }
    }
}

/// Clamps a requested capacity to at least one entry.
pub fn coerce_capacity(requested: i64) -> usize {
    usize::try_from(requested.max(1)).unwrap_or(usize::MAX)
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(name).and_then(|v| v.trim().parse().ok())
}
