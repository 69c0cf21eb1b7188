//! Shift arrival log.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::model::{Checkin, PeriodDate, Slot, UserId};
use crate::core::store::RosterStore;
use crate::core::RosterError;

/// Observational log of shift arrivals.
///
/// Recording is an idempotent upsert with no capacity or authorization
/// checks; it never gates booking.
pub struct CheckinTracker {
    store: Arc<dyn RosterStore>,
}

impl CheckinTracker {
    /// Create a tracker over the shared store.
    pub fn new(store: Arc<dyn RosterStore>) -> Self {
        Self { store }
    }

    /// Record (or re-read) the user's arrival for a booked slot.
    pub fn record_checkin(
        &self,
        user: UserId,
        period: PeriodDate,
        slot: Slot,
        now: DateTime<Utc>,
    ) -> Result<Checkin, RosterError> {
        let stored = self.store.upsert_checkin(Checkin {
            user,
            period,
            slot,
            checked_in_at: now,
        })?;
        tracing::debug!(%user, %period, %slot, "check-in recorded");
        Ok(stored)
    }
}
