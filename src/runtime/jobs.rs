//! Non-overlapping periodic job harness.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::core::AppResult;
use crate::runtime::Spawn;

/// Handle controlling a spawned periodic job.
///
/// Dropping the handle also ends the job: the loop observes the closed
/// shutdown channel on its next wakeup.
pub struct JobHandle {
    name: &'static str,
    shutdown: watch::Sender<bool>,
}

impl JobHandle {
    /// Name the job was spawned under.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Signal the job loop to exit after its current tick.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }
}

/// Spawn a named job running `tick` every `every`.
///
/// Ticks run sequentially inside one task: a tick still executing when the
/// next is due delays it rather than overlapping it. Tick errors are logged
/// and the loop continues; only [`JobHandle::stop`] (or runtime shutdown)
/// ends the job.
pub fn spawn_periodic<S, F, Fut>(
    spawner: &S,
    name: &'static str,
    every: Duration,
    mut tick: F,
) -> JobHandle
where
    S: Spawn,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = AppResult<()>> + Send,
{
    let (shutdown, mut stopped) = watch::channel(false);
    spawner.spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(job = name, period_secs = every.as_secs(), "periodic job started");
        loop {
            tokio::select! {
                changed = stopped.changed() => {
                    if changed.is_err() || *stopped.borrow() {
                        tracing::info!(job = name, "periodic job stopped");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if let Err(e) = tick().await {
                        tracing::error!(job = name, error = %e, "periodic tick failed");
                    }
                }
            }
        }
    });
    JobHandle { name, shutdown }
}
