//! Wire roster components from a validated configuration.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{ConfigHandle, RosterConfig};
use crate::core::gateway::ChatGateway;
use crate::core::store::RosterStore;
use crate::core::{
    BookingLedger, CheckinTracker, DailyPeriodManager, NotificationScheduler, RosterError,
    SessionManager,
};
use crate::runtime::{spawn_periodic, JobHandle, Spawn};
use crate::util::clock;

/// Rotation cadence. Rotation is idempotent, so running it well below daily
/// keeps the window correct across restarts and clock jumps.
const ROTATE_EVERY: Duration = Duration::from_secs(600);
/// Notification scan cadence.
const NOTIFY_EVERY: Duration = Duration::from_secs(60);
/// Session expiry sweep cadence.
const SWEEP_EVERY: Duration = Duration::from_secs(60);

/// Bundle of wired roster components sharing one store, gateway, and config.
pub struct RosterService {
    /// Capacity-constrained booking ledger.
    pub ledger: Arc<BookingLedger>,
    /// Selection session store.
    pub sessions: Arc<SessionManager>,
    /// Rolling-window period lifecycle.
    pub rotation: Arc<DailyPeriodManager>,
    /// Pre-shift notification emitter.
    pub notifier: Arc<NotificationScheduler>,
    /// Shift arrival log.
    pub checkins: Arc<CheckinTracker>,
    /// Handle to the current configuration snapshot.
    pub config: ConfigHandle,
}

/// Validate configuration and wire all roster components over the given
/// store and gateway.
pub fn build_roster(
    cfg: RosterConfig,
    store: Arc<dyn RosterStore>,
    gateway: Arc<dyn ChatGateway>,
) -> Result<RosterService, RosterError> {
    cfg.validate()
        .map_err(|e| RosterError::Validation(format!("config invalid: {e}")))?;
    let config = ConfigHandle::new(cfg);

    let ledger = Arc::new(BookingLedger::new(Arc::clone(&store), config.clone()));
    let sessions = Arc::new(SessionManager::new(Arc::clone(&ledger), config.clone()));
    let rotation = Arc::new(DailyPeriodManager::new(
        Arc::clone(&store),
        Arc::clone(&gateway),
        Arc::clone(&ledger),
        config.clone(),
    ));
    let notifier = Arc::new(NotificationScheduler::new(
        Arc::clone(&store),
        Arc::clone(&gateway),
        config.clone(),
    ));
    let checkins = Arc::new(CheckinTracker::new(store));

    Ok(RosterService {
        ledger,
        sessions,
        rotation,
        notifier,
        checkins,
        config,
    })
}

/// Start the rotation, notification, and session-sweep jobs.
///
/// Each job serializes its own ticks; stop them through the returned handles.
pub fn start_background_jobs<S: Spawn>(service: &RosterService, spawner: &S) -> Vec<JobHandle> {
    let rotation = Arc::clone(&service.rotation);
    let rotate_job = spawn_periodic(spawner, "period-rotation", ROTATE_EVERY, move || {
        let rotation = Arc::clone(&rotation);
        async move {
            rotation.rotate(clock::now()).await?;
            Ok(())
        }
    });

    let notifier = Arc::clone(&service.notifier);
    let notify_job = spawn_periodic(spawner, "shift-notifications", NOTIFY_EVERY, move || {
        let notifier = Arc::clone(&notifier);
        async move {
            notifier.tick(clock::now()).await?;
            Ok(())
        }
    });

    let sessions = Arc::clone(&service.sessions);
    let sweep_job = spawn_periodic(spawner, "session-sweep", SWEEP_EVERY, move || {
        let sessions = Arc::clone(&sessions);
        async move {
            sessions.sweep_expired(clock::now());
            Ok(())
        }
    });

    vec![rotate_job, notify_job, sweep_job]
}
