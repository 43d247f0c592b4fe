//! Cache Entry Module
//!
//! Defines a single cached record with optional TTL expiry.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// One cached record: key, opaque value bytes and an optional deadline.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The key this entry is indexed under
    pub key: String,
    /// The stored value
    pub value: Vec<u8>,
    /// Absolute expiry instant, None = never expires
    pub expires_at: Option<Instant>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry with optional TTL.
    ///
    /// A zero TTL means the entry never expires.
    ///
    /// # Arguments
    /// * `key` - The key of the entry
    /// * `value` - The value to store
    /// * `ttl` - Optional time to live, measured from now
    pub fn new(key: String, value: Vec<u8>, ttl: Option<Duration>) -> Self {
        Self {
            key,
            value,
            expires_at: expiry_from(ttl, Instant::now()),
        }
    }

    // == Update ==
    /// Replaces the value and recomputes the expiry in place.
    pub fn update(&mut self, value: Vec<u8>, ttl: Option<Duration>) {
        self.value = value;
        self.expires_at = expiry_from(ttl, Instant::now());
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once `now >= expires_at`, so
    /// it disappears the moment its TTL has fully elapsed.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against a caller-supplied clock
    /// reading, so a sweep can judge every entry against one instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Converts a relative TTL into an absolute expiry instant.
///
/// Returns None for a missing or zero TTL, and for a TTL so large that the
/// deadline cannot be represented.
pub fn expiry_from(ttl: Option<Duration>, now: Instant) -> Option<Instant> {
    ttl.filter(|ttl| !ttl.is_zero())
        .and_then(|ttl| now.checked_add(ttl))
}
