//! Counters kept alongside the store. They only grow; `clear` on the store
//! leaves them alone.

use serde::Serialize;

/// Lookup and removal counters, plus the entry count at the time of the
/// snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    /// Lookups that found nothing, including expired entries
    pub misses: u64,
    /// Entries pushed out by the capacity bound
    pub evictions: u64,
    /// Entries removed because their TTL elapsed, on read or by the sweeper
    pub expirations: u64,
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total `get` calls seen.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups that hit, 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: u64) {
        self.expirations += count;
    }

    /// Copy of the counters stamped with the current entry count.
    pub fn snapshot(&self, total_entries: usize) -> Self {
        Self {
            total_entries,
            ..self.clone()
        }
    }
}
