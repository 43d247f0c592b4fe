//! Cache Store Module
//!
//! The unsynchronised core of the cache: a HashMap index into an arena-backed
//! recency list, with LRU eviction and TTL expiration. Callers provide the
//! locking; see [`CacheEngine`](crate::cache::CacheEngine).

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::cache::lru::NodeIndex;
use crate::cache::{CacheEntry, CacheStats, RecencyList};

// == Cache Store ==
/// Bounded key/value storage with LRU eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore {
    /// Key to position in `order`
    index: HashMap<String, NodeIndex>,
    /// Recency order, front = most recently used
    order: RecencyList,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed, always >= 1
    capacity: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `capacity` entries.
    ///
    /// A capacity of zero is coerced to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            index: HashMap::with_capacity(capacity.min(1 << 16)),
            order: RecencyList::with_capacity(capacity.min(1 << 16)),
            stats: CacheStats::new(),
            capacity,
        }
    }

    // == Get ==
    /// Retrieves a copy of the value stored under `key`.
    ///
    /// A hit marks the entry as most recently used. An entry whose TTL has
    /// elapsed is removed on the spot and reported as absent, even if the
    /// background sweep has not reached it yet.
    pub fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        let Some(&idx) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        let expired = self
            .order
            .get(idx)
            .map_or(true, |entry| entry.is_expired_at(Instant::now()));
        if expired {
            self.index.remove(key);
            self.order.remove(idx);
            self.stats.record_miss();
            self.stats.record_expirations(1);
            debug!(key, "lazily expired entry on access");
            return None;
        }

        self.order.move_to_front(idx);
        self.stats.record_hit();
        self.order.get(idx).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Stores a value under `key`.
    ///
    /// An existing entry is updated in place (value replaced, expiry
    /// recomputed) and becomes most recently used. A new entry is inserted at
    /// the front; if that takes the store over capacity, the least recently
    /// used entry is evicted.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional time to live; None or zero never expires
    pub fn set(&mut self, key: String, value: Vec<u8>, ttl: Option<Duration>) {
        if let Some(&idx) = self.index.get(&key) {
            if let Some(entry) = self.order.get_mut(idx) {
                entry.update(value, ttl);
                self.order.move_to_front(idx);
                return;
            }
        }

        let idx = self
            .order
            .push_front(CacheEntry::new(key.clone(), value, ttl));
        self.index.insert(key, idx);

        if self.order.len() > self.capacity {
            self.evict_lru();
        }
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether the key was present.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.index.remove(key) {
            Some(idx) => self.order.remove(idx).is_some(),
            None => false,
        }
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.order.len())
    }

    // == Cleanup Expired ==
    /// Removes every entry whose TTL has elapsed.
    ///
    /// Scans the recency order once, front to back, against a single clock
    /// reading. Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<NodeIndex> = self
            .order
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(idx, _)| idx)
            .collect();

        for &idx in &expired {
            if let Some(entry) = self.order.remove(idx) {
                self.index.remove(&entry.key);
            }
        }

        self.stats.record_expirations(expired.len() as u64);
        expired.len()
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
    }

    // == Length ==
    /// Returns the current number of entries, including any that have
    /// expired but not been swept yet.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.order.iter().map(|(_, entry)| entry.key.clone()).collect()
    }

    // == Integrity ==
    /// Checks the structural invariants: the index and the recency order
    /// hold the same keys one-to-one, the list links are sound, and the
    /// entry count is within capacity.
    pub fn is_consistent(&self) -> bool {
        self.capacity >= 1
            && self.index.len() == self.order.len()
            && self.order.len() <= self.capacity
            && self.order.links_consistent()
            && self
                .order
                .iter()
                .all(|(idx, entry)| self.index.get(&entry.key) == Some(&idx))
    }

    fn evict_lru(&mut self) {
        if let Some(entry) = self.order.pop_back() {
            self.index.remove(&entry.key);
            self.stats.record_eviction();
            debug!(key = %entry.key, "evicted least recently used entry");
        }
    }
}
