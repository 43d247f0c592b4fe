//! Background Tasks Module
//!
//! Contains background tasks that run periodically while a cache is alive.
//!
//! # Tasks
//! - TTL Sweep: Removes expired cache entries at a fixed interval

mod sweeper;

pub use sweeper::{spawn_sweep_task, SweeperHandle, MIN_SWEEP_INTERVAL};
