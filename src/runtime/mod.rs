//! Runtime adapters: task spawning and the periodic job harness.

use std::future::Future;

/// Non-overlapping periodic jobs with a stop lifecycle.
pub mod jobs;
/// Tokio-based spawner.
pub mod tokio_spawner;

pub use jobs::{spawn_periodic, JobHandle};
pub use tokio_spawner::TokioSpawner;

/// Abstraction for spawning task execution on a runtime.
pub trait Spawn {
    /// Spawn an async task that returns a future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}
