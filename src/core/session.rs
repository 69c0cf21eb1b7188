//! Multi-step selection sessions: the in-progress, uncommitted booking builder.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::config::ConfigHandle;
use crate::core::ledger::BookingLedger;
use crate::core::model::{CommitOutcome, PeriodDate, Slot, UserId};
use crate::core::RosterError;

/// Progress of a selection session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// A period is chosen; no slots accumulated yet.
    DateChosen,
    /// Slots were derived from a start/end hour range.
    RangeChosen,
    /// Slots were accumulated through discrete picks.
    MultiSlotChosen,
}

/// One user's in-progress booking request. Ephemeral UX scaffolding; lost on
/// restart by design.
#[derive(Debug, Clone)]
struct SelectionSession {
    date: PeriodDate,
    username: String,
    role: String,
    state: SessionState,
    slots: BTreeSet<Slot>,
    range_start: Option<Slot>,
    last_touched: DateTime<Utc>,
}

/// Read-only view of a session, for rendering and tests.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Chosen period.
    pub date: PeriodDate,
    /// Current progress state.
    pub state: SessionState,
    /// Accumulated slot set.
    pub slots: BTreeSet<Slot>,
}

/// Keyed store of selection sessions, at most one per user.
///
/// A new `select_date` overwrites any prior session; confirm and cancel
/// consume it. Abandoned sessions are dropped by [`SessionManager::sweep_expired`],
/// which a periodic job runs.
pub struct SessionManager {
    sessions: Mutex<HashMap<UserId, SelectionSession>>,
    ledger: Arc<BookingLedger>,
    config: ConfigHandle,
}

impl SessionManager {
    /// Create a session manager committing through the given ledger.
    pub fn new(ledger: Arc<BookingLedger>, config: ConfigHandle) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ledger,
            config,
        }
    }

    /// Start (or restart) a session for the user on the given period.
    pub fn select_date(
        &self,
        user: UserId,
        username: &str,
        date: PeriodDate,
        now: DateTime<Utc>,
    ) -> Result<(), RosterError> {
        let role = self.config.snapshot().default_role.clone();
        let session = SelectionSession {
            date,
            username: username.to_string(),
            role,
            state: SessionState::DateChosen,
            slots: BTreeSet::new(),
            range_start: None,
            last_touched: now,
        };
        self.sessions.lock().insert(user, session);
        tracing::debug!(%user, %date, "selection session started");
        Ok(())
    }

    /// Record the start hour of a range selection.
    pub fn select_start(
        &self,
        user: UserId,
        start: Slot,
        now: DateTime<Utc>,
    ) -> Result<(), RosterError> {
        let mut sessions = self.sessions.lock();
        let session = sessions
            .get_mut(&user)
            .ok_or_else(|| RosterError::NotFound(format!("no selection session for {user}")))?;
        session.range_start = Some(start);
        session.last_touched = now;
        Ok(())
    }

    /// Record the end hour and derive the inclusive slot range.
    ///
    /// An end before the recorded start is a validation error; the session
    /// stays in `DateChosen` with its start hour retained.
    pub fn select_end(
        &self,
        user: UserId,
        end: Slot,
        now: DateTime<Utc>,
    ) -> Result<Vec<Slot>, RosterError> {
        let mut sessions = self.sessions.lock();
        let session = sessions
            .get_mut(&user)
            .ok_or_else(|| RosterError::NotFound(format!("no selection session for {user}")))?;
        let start = session
            .range_start
            .ok_or_else(|| RosterError::Validation("select a start time first".into()))?;
        let range = Slot::range_inclusive(start, end)?;
        session.slots = range.iter().copied().collect();
        session.state = SessionState::RangeChosen;
        session.last_touched = now;
        Ok(range)
    }

    /// Accumulate discrete slot picks; duplicates collapse in the set.
    pub fn add_slots(
        &self,
        user: UserId,
        slots: impl IntoIterator<Item = Slot>,
        now: DateTime<Utc>,
    ) -> Result<(), RosterError> {
        let mut sessions = self.sessions.lock();
        let session = sessions
            .get_mut(&user)
            .ok_or_else(|| RosterError::NotFound(format!("no selection session for {user}")))?;
        session.slots.extend(slots);
        session.state = SessionState::MultiSlotChosen;
        session.last_touched = now;
        Ok(())
    }

    /// Commit the accumulated slot set through the ledger.
    ///
    /// The session is consumed exactly once: it is taken out of the map
    /// before the commit, so a second confirm observes `NotFound`. The
    /// session is cleared regardless of the per-slot outcomes.
    pub fn confirm(
        &self,
        user: UserId,
    ) -> Result<BTreeMap<Slot, CommitOutcome>, RosterError> {
        let session = {
            let mut sessions = self.sessions.lock();
            match sessions.entry(user) {
                Entry::Vacant(_) => {
                    return Err(RosterError::NotFound(format!(
                        "no selection session for {user}"
                    )))
                }
                Entry::Occupied(entry) => {
                    if entry.get().slots.is_empty() {
                        return Err(RosterError::Validation("no slots selected".into()));
                    }
                    entry.remove()
                }
            }
        };

        tracing::info!(%user, date = %session.date, slots = session.slots.len(), "session confirmed");
        self.ledger.commit(
            session.date,
            user,
            &session.username,
            &session.role,
            &session.slots,
        )
    }

    /// Drop the user's session unconditionally; reports whether one existed.
    pub fn cancel(&self, user: UserId) -> bool {
        let existed = self.sessions.lock().remove(&user).is_some();
        if existed {
            tracing::debug!(%user, "selection session cancelled");
        }
        existed
    }

    /// Read-only view of the user's session, if any.
    pub fn peek(&self, user: UserId) -> Option<SessionSnapshot> {
        self.sessions.lock().get(&user).map(|s| SessionSnapshot {
            date: s.date,
            state: s.state,
            slots: s.slots.clone(),
        })
    }

    /// Drop sessions idle longer than the configured TTL; returns the count.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let ttl = Duration::minutes(self.config.snapshot().selection_ttl_minutes);
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, s| now - s.last_touched < ttl);
        let swept = before - sessions.len();
        if swept > 0 {
            tracing::info!(swept, "expired selection sessions dropped");
        }
        swept
    }
}
