//! Postgres-backed roster store (schema and interface stubs).

use crate::core::model::{Booking, Checkin, MessageId, Period, PeriodDate, Slot, UserId};
use crate::core::store::{InsertOutcome, RosterStore};
use crate::core::RosterError;

/// Postgres store adapter placeholder.
pub struct PostgresStore;

impl PostgresStore {
    /// Create a new adapter.
    pub fn new() -> Self {
        Self
    }

    /// Migration statements for roster persistence.
    pub fn migrations() -> &'static [&'static str] {
        &[
            r#"
CREATE TABLE IF NOT EXISTS periods (
    date TEXT PRIMARY KEY,
    status TEXT NOT NULL DEFAULT 'active',
    channel_id TEXT,
    roster_message_id TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE TABLE IF NOT EXISTS roster (
    id BIGSERIAL PRIMARY KEY,
    period TEXT NOT NULL REFERENCES periods(date) ON DELETE CASCADE,
    time_slot TEXT NOT NULL,
    user_id TEXT NOT NULL,
    username TEXT NOT NULL,
    role TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE(period, time_slot, user_id)
);
CREATE INDEX IF NOT EXISTS idx_roster_period_slot ON roster (period, time_slot);
CREATE TABLE IF NOT EXISTS notifications (
    id BIGSERIAL PRIMARY KEY,
    period TEXT NOT NULL,
    time_slot TEXT NOT NULL,
    sent BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE(period, time_slot)
);
CREATE TABLE IF NOT EXISTS checkins (
    id BIGSERIAL PRIMARY KEY,
    user_id TEXT NOT NULL,
    period TEXT NOT NULL,
    time_slot TEXT NOT NULL,
    checked_in_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE(user_id, period, time_slot)
);
"#,
        ]
    }

    /// Conditional insert enforcing uniqueness and capacity in one statement.
    ///
    /// Bind order: period, time_slot, user_id, username, role, capacity.
    /// Zero rows affected means duplicate or full; the caller disambiguates
    /// with a follow-up count inside the same transaction.
    pub fn conditional_insert_sql() -> &'static str {
        r#"
INSERT INTO roster (period, time_slot, user_id, username, role)
SELECT $1, $2, $3, $4, $5
WHERE (SELECT COUNT(*) FROM roster WHERE period = $1 AND time_slot = $2) < $6
ON CONFLICT (period, time_slot, user_id) DO NOTHING
"#
    }
}

impl Default for PostgresStore {
    fn default() -> Self {
        Self::new()
    }
}

fn not_wired<T>() -> Result<T, RosterError> {
    Err(RosterError::Persistence(
        "postgres store not wired to database client".into(),
    ))
}

impl RosterStore for PostgresStore {
    fn list_periods(&self) -> Result<Vec<Period>, RosterError> {
        not_wired()
    }

    fn get_period(&self, _date: PeriodDate) -> Result<Option<Period>, RosterError> {
        not_wired()
    }

    fn create_period(&self, _period: Period) -> Result<(), RosterError> {
        not_wired()
    }

    fn remove_period(&self, _date: PeriodDate) -> Result<(), RosterError> {
        not_wired()
    }

    fn set_roster_message(
        &self,
        _date: PeriodDate,
        _message: MessageId,
    ) -> Result<(), RosterError> {
        not_wired()
    }

    fn insert_booking(
        &self,
        _booking: Booking,
        _capacity: u32,
    ) -> Result<InsertOutcome, RosterError> {
        not_wired()
    }

    fn bookings_for_period(&self, _date: PeriodDate) -> Result<Vec<Booking>, RosterError> {
        not_wired()
    }

    fn bookings_for_slot(
        &self,
        _date: PeriodDate,
        _slot: Slot,
    ) -> Result<Vec<Booking>, RosterError> {
        not_wired()
    }

    fn delete_user_bookings(
        &self,
        _date: PeriodDate,
        _user: UserId,
    ) -> Result<usize, RosterError> {
        not_wired()
    }

    fn clear_period_data(&self, _date: PeriodDate) -> Result<(), RosterError> {
        not_wired()
    }

    fn ensure_notification(&self, _date: PeriodDate, _slot: Slot) -> Result<bool, RosterError> {
        not_wired()
    }

    fn mark_notification_sent(
        &self,
        _date: PeriodDate,
        _slot: Slot,
    ) -> Result<(), RosterError> {
        not_wired()
    }

    fn upsert_checkin(&self, _checkin: Checkin) -> Result<Checkin, RosterError> {
        not_wired()
    }
}
