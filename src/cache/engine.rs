//! Cache Engine Module
//!
//! Thread-safe front of the cache. One exclusive lock guards the index and
//! recency order as a unit, since reads reorder too. The background sweeper
//! takes the same lock.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::info;

use crate::cache::{CacheStats, CacheStore};
use crate::tasks::{spawn_sweep_task, SweeperHandle};

/// Default number of entries an engine holds.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default time between background sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

// == Engine Config ==
/// Construction parameters for a [`CacheEngine`].
///
/// ```rust,no_run
/// use lru_kv::cache::{CacheEngine, EngineConfig};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let config = EngineConfig::new(10_000)
///         .with_sweep_interval(Duration::from_millis(500));
///     let cache = CacheEngine::with_config(config);
///     cache.set("key", b"value".to_vec(), None).await;
///     cache.stop().await;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of entries (values below 1 are raised to 1)
    pub capacity: usize,
    /// Interval between background expiry sweeps
    pub sweep_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl EngineConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

// == Sweeper State ==
/// Lifecycle of the engine's background sweeper. It only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweeperState {
    /// Ticking and sweeping
    Running,
    /// Stop signal sent, waiting for the task to exit
    StopRequested,
    /// Task has exited
    Stopped,
}

impl SweeperState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => SweeperState::Running,
            1 => SweeperState::StopRequested,
            _ => SweeperState::Stopped,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            SweeperState::Running => 0,
            SweeperState::StopRequested => 1,
            SweeperState::Stopped => 2,
        }
    }
}

// == Cache Engine ==
/// Bounded LRU cache with TTL expiration, safe to share between tasks.
///
/// Expired entries are never returned: `get` removes them lazily, and a
/// background sweeper removes the rest every sweep interval. Call
/// [`stop`](Self::stop) to shut the sweeper down and wait for it; dropping
/// the engine also signals it, without waiting.
#[derive(Debug)]
pub struct CacheEngine {
    store: Arc<Mutex<CacheStore>>,
    capacity: usize,
    sweeper: Mutex<Option<SweeperHandle>>,
    sweeper_state: AtomicU8,
}

impl CacheEngine {
    // == Constructor ==
    /// Creates an engine holding at most `capacity` entries (minimum 1),
    /// sweeping every [`DEFAULT_SWEEP_INTERVAL`].
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime; the sweeper is a Tokio
    /// task.
    pub fn new(capacity: usize) -> Self {
        Self::with_config(EngineConfig::new(capacity))
    }

    /// Creates an engine from an [`EngineConfig`] and starts its sweeper.
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime.
    pub fn with_config(config: EngineConfig) -> Self {
        if tokio::runtime::Handle::try_current().is_err() {
            panic!(
                "lru_kv::cache::CacheEngine requires a Tokio runtime. \
                 Construct it from within #[tokio::main], #[tokio::test] \
                 or other code running on a Tokio runtime."
            );
        }

        let store = CacheStore::new(config.capacity);
        let capacity = store.capacity();
        let store = Arc::new(Mutex::new(store));
        let sweeper = spawn_sweep_task(store.clone(), config.sweep_interval);

        info!(
            "Cache engine started: capacity={}, sweep_interval={:?}",
            capacity, config.sweep_interval
        );

        Self {
            store,
            capacity,
            sweeper: Mutex::new(Some(sweeper)),
            sweeper_state: AtomicU8::new(SweeperState::Running.as_u8()),
        }
    }

    // == Get ==
    /// Returns the value stored under `key`, marking it most recently used.
    ///
    /// Absent, deleted and expired keys all read as `None`.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.store.lock().await.get(key)
    }

    // == Set ==
    /// Inserts or overwrites `key`. A `ttl` of `None` or zero never expires.
    ///
    /// Inserting a new key into a full cache evicts the least recently used
    /// entry.
    pub async fn set(&self, key: impl Into<String>, value: impl Into<Vec<u8>>, ttl: Option<Duration>) {
        let (key, value) = (key.into(), value.into());
        self.store.lock().await.set(key, value, ttl);
    }

    // == Delete ==
    /// Removes `key` if present. Returns whether anything was removed.
    pub async fn delete(&self, key: &str) -> bool {
        self.store.lock().await.delete(key)
    }

    /// Number of stored entries, which may include expired entries the
    /// sweeper has not reached yet.
    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.is_empty()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.lock().await.stats()
    }

    /// Drops every entry.
    pub async fn clear(&self) {
        self.store.lock().await.clear();
    }

    /// See [`CacheStore::is_consistent`].
    pub async fn is_consistent(&self) -> bool {
        self.store.lock().await.is_consistent()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Stop ==
    /// Stops the background sweeper and waits until it has exited.
    ///
    /// Safe to call more than once and from several tasks at a time: later
    /// callers wait for the first shutdown to complete, then return. If a
    /// `stop` is cancelled mid-wait, the next call picks the wait back up.
    pub async fn stop(&self) {
        let mut slot = self.sweeper.lock().await;
        let Some(sweeper) = slot.as_mut() else {
            return;
        };

        self.set_sweeper_state(SweeperState::StopRequested);
        sweeper.signal();
        sweeper.join().await;

        // The handle is spent once joined
        *slot = None;
        self.set_sweeper_state(SweeperState::Stopped);
        info!("Cache engine stopped");
    }

    pub fn sweeper_state(&self) -> SweeperState {
        SweeperState::from_u8(self.sweeper_state.load(Ordering::Acquire))
    }

    fn set_sweeper_state(&self, state: SweeperState) {
        self.sweeper_state.store(state.as_u8(), Ordering::Release);
    }

    #[cfg(test)]
    pub(crate) async fn lock_store(&self) -> tokio::sync::MutexGuard<'_, CacheStore> {
        self.store.lock().await
    }
}

impl Drop for CacheEngine {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.get_mut().as_ref() {
            sweeper.signal();
        }
    }
}
