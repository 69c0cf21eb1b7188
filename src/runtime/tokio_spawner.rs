//! Tokio runtime spawner implementation.

use std::future::Future;
use std::sync::Arc;

use crate::runtime::Spawn;

#[derive(Clone)]
enum Inner {
    Handle(tokio::runtime::Handle),
    Owned(Arc<tokio::runtime::Runtime>),
}

/// Tokio-based spawner that executes tasks on a tokio runtime.
///
/// Either borrows an existing runtime handle or owns a dedicated runtime,
/// keeping the runtime alive for as long as any clone of the spawner exists.
#[derive(Clone)]
pub struct TokioSpawner {
    inner: Inner,
}

impl TokioSpawner {
    /// Create a spawner from an existing tokio runtime handle.
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self {
            inner: Inner::Handle(handle),
        }
    }

    /// Create a spawner for the runtime of the calling context.
    ///
    /// # Panics
    ///
    /// Panics outside a tokio runtime, like [`tokio::runtime::Handle::current`].
    pub fn current() -> Self {
        Self::new(tokio::runtime::Handle::current())
    }

    /// Create a spawner owning a multi-threaded runtime with the given worker count.
    pub fn with_worker_threads(worker_threads: usize) -> Result<Self, std::io::Error> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(worker_threads)
            .enable_all()
            .build()?;
        Ok(Self {
            inner: Inner::Owned(Arc::new(runtime)),
        })
    }

    /// Create a spawner owning a runtime sized to the machine's CPU count.
    pub fn with_default_threads() -> Result<Self, std::io::Error> {
        Self::with_worker_threads(num_cpus::get())
    }
}

impl Spawn for TokioSpawner {
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match &self.inner {
            Inner::Handle(handle) => {
                handle.spawn(fut);
            }
            Inner::Owned(runtime) => {
                runtime.spawn(fut);
            }
        }
    }
}
