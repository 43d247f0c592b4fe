//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries, with a
//! stop handshake: a `watch` channel carries the stop request and the task's
//! `JoinHandle` confirms it has exited.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;

/// Shortest interval the sweeper accepts; `tokio::time::interval` rejects zero.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Owner side of a running sweep task.
///
/// Dropping the handle closes the stop channel, which also ends the task at
/// its next wakeup.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Asks the task to stop without waiting for it.
    pub fn signal(&self) {
        // Err only means the task has already exited.
        let _ = self.shutdown_tx.send(true);
    }

    /// Asks the task to stop and waits until it has exited. A sweep that is
    /// already running finishes first.
    pub async fn shutdown(mut self) {
        self.signal();
        self.join().await;
    }

    /// Waits for the task to exit, leaving the handle in place.
    ///
    /// Dropping this future before it resolves loses nothing; awaiting it
    /// again resumes the wait. Once it has resolved it must not be awaited
    /// again.
    pub async fn join(&mut self) {
        if let Err(err) = (&mut self.handle).await {
            warn!("TTL sweep task exited abnormally: {}", err);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawns a background task that periodically sweeps expired entries.
///
/// The first sweep runs one full `interval` after spawning. Each sweep holds
/// the store lock for a single pass over the entries.
///
/// # Arguments
/// * `store` - Shared store, the same lock callers use
/// * `interval` - Time between sweeps
///
/// # Panics
/// Must be called from within a Tokio runtime.
pub fn spawn_sweep_task(store: Arc<Mutex<CacheStore>>, interval: Duration) -> SweeperHandle {
    let interval = interval.max(MIN_SWEEP_INTERVAL);
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(async move {
        info!("Starting TTL sweep task with interval of {:?}", interval);

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = store.lock().await.cleanup_expired();

                    if removed > 0 {
                        info!("TTL sweep: removed {} expired entries", removed);
                    } else {
                        debug!("TTL sweep: no expired entries found");
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("TTL sweep task stopped");
    });

    SweeperHandle {
        shutdown_tx,
        handle,
    }
}
