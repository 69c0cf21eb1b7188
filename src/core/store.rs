//! Storage contract for roster state.
//!
//! All mutation of bookings, notifications, and check-ins flows through this
//! trait; no component writes a backend directly. The capacity guard lives in
//! [`RosterStore::insert_booking`]: the count check and the insert are one
//! conditional write evaluated under the backend's own synchronization, so
//! two racing commits can never both take the last seat.

use crate::core::model::{Booking, Checkin, MessageId, Period, PeriodDate, Slot, UserId};
use crate::core::RosterError;

/// Result of a conditional booking insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The booking was written.
    Inserted,
    /// The user already holds this (period, slot); nothing written.
    Duplicate,
    /// The slot is at capacity; nothing written.
    CapacityExhausted,
}

/// Abstraction over roster storage backends.
pub trait RosterStore: Send + Sync {
    /// All known periods, in date order.
    fn list_periods(&self) -> Result<Vec<Period>, RosterError>;

    /// Look up one period by date.
    fn get_period(&self, date: PeriodDate) -> Result<Option<Period>, RosterError>;

    /// Persist a newly created period.
    fn create_period(&self, period: Period) -> Result<(), RosterError>;

    /// Remove a period row. Dependent records must already be cleared.
    fn remove_period(&self, date: PeriodDate) -> Result<(), RosterError>;

    /// Record the id of the period's pinned roster message.
    fn set_roster_message(
        &self,
        date: PeriodDate,
        message: MessageId,
    ) -> Result<(), RosterError>;

    /// Conditionally insert a booking, enforcing uniqueness and capacity as
    /// one atomic step.
    fn insert_booking(
        &self,
        booking: Booking,
        capacity: u32,
    ) -> Result<InsertOutcome, RosterError>;

    /// Every booking in a period.
    fn bookings_for_period(&self, date: PeriodDate) -> Result<Vec<Booking>, RosterError>;

    /// Every booking for one (period, slot).
    fn bookings_for_slot(
        &self,
        date: PeriodDate,
        slot: Slot,
    ) -> Result<Vec<Booking>, RosterError>;

    /// Delete all of a user's bookings in a period; returns how many were removed.
    fn delete_user_bookings(
        &self,
        date: PeriodDate,
        user: UserId,
    ) -> Result<usize, RosterError>;

    /// Cascading delete of a period's bookings, notifications, and check-ins.
    fn clear_period_data(&self, date: PeriodDate) -> Result<(), RosterError>;

    /// Current `sent` flag for (period, slot), creating an unsent row if absent.
    fn ensure_notification(&self, date: PeriodDate, slot: Slot) -> Result<bool, RosterError>;

    /// Flip the notification row to `sent = true`.
    fn mark_notification_sent(&self, date: PeriodDate, slot: Slot) -> Result<(), RosterError>;

    /// Idempotent check-in upsert; returns the stored (possibly pre-existing) record.
    fn upsert_checkin(&self, checkin: Checkin) -> Result<Checkin, RosterError>;
}
