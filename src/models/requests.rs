//! Request DTOs for the cache server API
//!
//! Defines the query parameters and size limits of incoming requests. Values
//! travel as raw request bodies, so only the key and TTL need shaping.

use std::time::Duration;

use serde::Deserialize;

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

/// Query parameters for the SET operation (PUT /set/:key)
///
/// # Fields
/// - `ttl`: TTL in seconds; 0 or absent means the entry never expires
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetParams {
    #[serde(default)]
    pub ttl: u64,
}

impl SetParams {
    /// TTL as understood by the engine.
    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl > 0).then(|| Duration::from_secs(self.ttl))
    }
}

/// Validates a key.
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}

/// Validates a value's size.
pub fn validate_value(value: &[u8]) -> Option<String> {
    if value.len() > MAX_VALUE_SIZE {
        return Some(format!(
            "Value exceeds maximum size of {} bytes",
            MAX_VALUE_SIZE
        ));
    }
    None
}
