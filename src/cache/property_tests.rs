//! Property-Based Tests for Cache Module
//!
//! Uses proptest to drive the store with random operation sequences and
//! compare it against a naive reference LRU.

use proptest::prelude::*;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheEngine, CacheStore, EngineConfig};

// == Test Configuration ==
const TEST_CAPACITY: usize = 50;

// == Strategies ==
/// Keys from a tiny alphabet so sequences revisit the same keys often
fn colliding_key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,2}"
}

/// Generates valid cache keys from a wide space
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}"
}

fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Vec<u8> },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (colliding_key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        3 => colliding_key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => colliding_key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

// == Reference Model ==
/// O(n) LRU over a VecDeque; front = most recently used.
struct ModelLru {
    capacity: usize,
    entries: VecDeque<(String, Vec<u8>)>,
    evictions: u64,
}

impl ModelLru {
    fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
            evictions: 0,
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    fn set(&mut self, key: String, value: Vec<u8>) {
        match self.position(&key) {
            Some(pos) => {
                self.entries.remove(pos);
                self.entries.push_front((key, value));
            }
            None => {
                self.entries.push_front((key, value));
                if self.entries.len() > self.capacity {
                    self.entries.pop_back();
                    self.evictions += 1;
                }
            }
        }
    }

    fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        let pos = self.position(key)?;
        let entry = self.entries.remove(pos)?;
        let value = entry.1.clone();
        self.entries.push_front(entry);
        Some(value)
    }

    fn delete(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(pos) => self.entries.remove(pos).is_some(),
            None => false,
        }
    }

    fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // **Property: Reference Model Equivalence**
    // *For any* capacity and operation sequence, every result and the full
    // recency order match the naive LRU, and the index/list stay in sync.
    #[test]
    fn prop_matches_reference_model(
        capacity in 0usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..100)
    ) {
        let mut store = CacheStore::new(capacity);
        let mut model = ModelLru::new(capacity);

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), value.clone(), None);
                    model.set(key, value);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(store.get(&key), model.get(&key), "get({}) diverged", key);
                }
                CacheOp::Delete { key } => {
                    prop_assert_eq!(store.delete(&key), model.delete(&key), "delete({}) diverged", key);
                }
            }
            prop_assert_eq!(store.keys(), model.keys());
            prop_assert!(store.is_consistent(), "store invariants broken");
        }

        prop_assert_eq!(store.stats().evictions, model.evictions);
    }

    // **Property: Statistics Accuracy**
    // *For any* sequence of cache operations, hits and misses SHALL reflect
    // the outcome of each GET that occurred.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut store = CacheStore::new(TEST_CAPACITY);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => store.set(key, value, None),
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Delete { key } => {
                    store.delete(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, store.len(), "Total entries mismatch");
    }

    // **Property: Overwrite Semantics**
    // *For any* key, storing V1 then V2 SHALL leave one entry holding V2.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let mut store = CacheStore::new(TEST_CAPACITY);

        store.set(key.clone(), value1, None);
        store.set(key.clone(), value2.clone(), None);

        prop_assert_eq!(store.get(&key), Some(value2), "Overwrite should return new value");
        prop_assert_eq!(store.len(), 1, "Should have exactly one entry after overwrite");
    }

    // **Property: Capacity Enforcement**
    // *For any* sequence of SET operations, the number of entries SHALL
    // never exceed the capacity.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((valid_key_strategy(), value_strategy()), 1..200)
    ) {
        let capacity = 20;
        let mut store = CacheStore::new(capacity);

        for (key, value) in entries {
            store.set(key, value, None);
            prop_assert!(
                store.len() <= capacity,
                "Cache size {} exceeds capacity {}",
                store.len(),
                capacity
            );
        }
        prop_assert!(store.is_consistent());
    }

    // **Property: LRU Eviction Order**
    // *For any* full cache, inserting a new key SHALL evict exactly the entry
    // that was accessed least recently, after a GET refreshed the oldest one.
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::vec(valid_key_strategy(), 3..8),
        new_key in valid_key_strategy(),
        new_value in value_strategy()
    ) {
        let mut seen = HashSet::new();
        let unique_keys: Vec<String> = keys.into_iter().filter(|k| seen.insert(k.clone())).collect();

        prop_assume!(unique_keys.len() >= 3);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let mut store = CacheStore::new(capacity);

        for key in &unique_keys {
            store.set(key.clone(), key.as_bytes().to_vec(), None);
        }

        // Refresh the oldest key; the second one becomes the LRU candidate
        let accessed_key = unique_keys[0].clone();
        prop_assert!(store.get(&accessed_key).is_some());
        let expected_evicted = unique_keys[1].clone();

        store.set(new_key.clone(), new_value, None);

        prop_assert_eq!(store.len(), capacity);
        prop_assert!(store.get(&accessed_key).is_some(), "Accessed key should survive");
        prop_assert!(store.get(&expected_evicted).is_none(), "LRU key should be evicted");
        prop_assert!(store.get(&new_key).is_some(), "New key should exist");
    }
}

// Fewer cases: each one spins up a runtime and real tasks
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // **Property: Concurrent Operation Correctness**
    // *For any* set of operations issued concurrently, the engine SHALL end
    // within capacity with its index and recency order in agreement.
    #[test]
    fn prop_concurrent_operation_correctness(
        operations in prop::collection::vec(cache_op_strategy(), 10..80)
    ) {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .unwrap();

        rt.block_on(async {
            let config = EngineConfig::new(8).with_sweep_interval(Duration::from_millis(5));
            let cache = Arc::new(CacheEngine::with_config(config));

            let handles: Vec<_> = operations
                .into_iter()
                .map(|op| {
                    let cache = cache.clone();
                    tokio::spawn(async move {
                        match op {
                            CacheOp::Set { key, value } => {
                                cache.set(key, value, Some(Duration::from_millis(3))).await
                            }
                            CacheOp::Get { key } => {
                                cache.get(&key).await;
                            }
                            CacheOp::Delete { key } => {
                                cache.delete(&key).await;
                            }
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.await.expect("Task should not panic");
            }

            prop_assert!(cache.len().await <= 8);
            prop_assert!(cache.is_consistent().await);
            cache.stop().await;
            Ok(())
        })?;
    }
}

// == Property Test for Error Response Format ==

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // **Property: Error Response Format**
    // *For any* error condition, the HTTP response SHALL carry a JSON body
    // with an "error" string field.
    #[test]
    fn prop_error_response_format(error_msg in "[a-zA-Z0-9 _-]{1,100}") {
        use crate::error::CacheError;
        use axum::body::to_bytes;
        use axum::response::IntoResponse;

        let error_variants = vec![
            CacheError::NotFound(error_msg.clone()),
            CacheError::InvalidRequest(error_msg.clone()),
            CacheError::DeadlineExceeded(Duration::from_millis(error_msg.len() as u64)),
        ];

        for error in error_variants {
            let expected_msg = error.to_string();
            let response = error.into_response();

            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok());
            prop_assert!(
                content_type.map(|ct| ct.contains("application/json")).unwrap_or(false),
                "Response should have JSON content-type"
            );

            let bytes = tokio_test::block_on(to_bytes(response.into_body(), usize::MAX)).unwrap();
            let json: serde_json::Value =
                serde_json::from_slice(&bytes).expect("Response body should be valid JSON");

            prop_assert_eq!(json["error"].as_str(), Some(expected_msg.as_str()));
        }
    }
}

#[test]
fn test_model_evicts_back() {
    let mut model = ModelLru::new(2);
    model.set("a".into(), vec![1]);
    model.set("b".into(), vec![2]);
    model.get("a");
    model.set("c".into(), vec![3]);

    assert_eq!(model.keys(), vec!["c", "a"]);
    assert_eq!(model.evictions, 1);
}
