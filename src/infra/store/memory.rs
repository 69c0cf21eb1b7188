//! In-memory roster store for development and testing.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::core::model::{Booking, Checkin, MessageId, Period, PeriodDate, Slot, UserId};
use crate::core::store::{InsertOutcome, RosterStore};
use crate::core::RosterError;

#[derive(Default)]
struct StoreState {
    periods: BTreeMap<PeriodDate, Period>,
    bookings: BTreeMap<(PeriodDate, Slot), Vec<Booking>>,
    notifications: HashMap<(PeriodDate, Slot), bool>,
    checkins: HashMap<(UserId, PeriodDate, Slot), Checkin>,
}

/// In-memory store backed by a single mutex.
///
/// Holding one lock across the count check and the insert makes
/// [`RosterStore::insert_booking`] the atomic conditional write the ledger
/// requires.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
    fail_clears: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent [`RosterStore::clear_period_data`] calls fail, to
    /// exercise rotation's retry path in tests.
    pub fn set_fail_clears(&self, fail: bool) {
        self.fail_clears.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of all stored check-ins, for inspection in tests.
    pub fn checkins(&self) -> Vec<Checkin> {
        self.state.lock().checkins.values().cloned().collect()
    }

    /// Number of notification rows currently stored.
    pub fn notification_rows(&self) -> usize {
        self.state.lock().notifications.len()
    }
}

impl RosterStore for MemoryStore {
    fn list_periods(&self) -> Result<Vec<Period>, RosterError> {
        Ok(self.state.lock().periods.values().cloned().collect())
    }

    fn get_period(&self, date: PeriodDate) -> Result<Option<Period>, RosterError> {
        Ok(self.state.lock().periods.get(&date).cloned())
    }

    fn create_period(&self, period: Period) -> Result<(), RosterError> {
        let mut state = self.state.lock();
        if state.periods.contains_key(&period.date) {
            return Err(RosterError::Persistence(format!(
                "period {} already exists",
                period.date
            )));
        }
        state.periods.insert(period.date, period);
        Ok(())
    }

    fn remove_period(&self, date: PeriodDate) -> Result<(), RosterError> {
        self.state.lock().periods.remove(&date);
        Ok(())
    }

    fn set_roster_message(
        &self,
        date: PeriodDate,
        message: MessageId,
    ) -> Result<(), RosterError> {
        let mut state = self.state.lock();
        let period = state
            .periods
            .get_mut(&date)
            .ok_or_else(|| RosterError::NotFound(format!("no period for {date}")))?;
        period.roster_message = Some(message);
        Ok(())
    }

    fn insert_booking(
        &self,
        booking: Booking,
        capacity: u32,
    ) -> Result<InsertOutcome, RosterError> {
        let mut state = self.state.lock();
        let occupants = state
            .bookings
            .entry((booking.period, booking.slot))
            .or_default();
        if occupants.iter().any(|b| b.user == booking.user) {
            return Ok(InsertOutcome::Duplicate);
        }
        if occupants.len() as u32 >= capacity {
            return Ok(InsertOutcome::CapacityExhausted);
        }
        occupants.push(booking);
        Ok(InsertOutcome::Inserted)
    }

    fn bookings_for_period(&self, date: PeriodDate) -> Result<Vec<Booking>, RosterError> {
        let state = self.state.lock();
        Ok(state
            .bookings
            .range((date, Slot::from_hour(0)?)..=(date, Slot::from_hour(23)?))
            .flat_map(|(_, v)| v.iter().cloned())
            .collect())
    }

    fn bookings_for_slot(
        &self,
        date: PeriodDate,
        slot: Slot,
    ) -> Result<Vec<Booking>, RosterError> {
        let state = self.state.lock();
        Ok(state
            .bookings
            .get(&(date, slot))
            .cloned()
            .unwrap_or_default())
    }

    fn delete_user_bookings(
        &self,
        date: PeriodDate,
        user: UserId,
    ) -> Result<usize, RosterError> {
        let mut state = self.state.lock();
        let mut removed = 0;
        for ((d, _), occupants) in state.bookings.iter_mut() {
            if *d != date {
                continue;
            }
            let before = occupants.len();
            occupants.retain(|b| b.user != user);
            removed += before - occupants.len();
        }
        state.bookings.retain(|_, occupants| !occupants.is_empty());
        Ok(removed)
    }

    fn clear_period_data(&self, date: PeriodDate) -> Result<(), RosterError> {
        if self.fail_clears.load(Ordering::SeqCst) {
            return Err(RosterError::Persistence(
                "cascading delete failed (injected)".into(),
            ));
        }
        let mut state = self.state.lock();
        state.bookings.retain(|(d, _), _| *d != date);
        state.notifications.retain(|(d, _), _| *d != date);
        state.checkins.retain(|(_, d, _), _| *d != date);
        Ok(())
    }

    fn ensure_notification(&self, date: PeriodDate, slot: Slot) -> Result<bool, RosterError> {
        let mut state = self.state.lock();
        Ok(*state.notifications.entry((date, slot)).or_insert(false))
    }

    fn mark_notification_sent(&self, date: PeriodDate, slot: Slot) -> Result<(), RosterError> {
        let mut state = self.state.lock();
        state.notifications.insert((date, slot), true);
        Ok(())
    }

    fn upsert_checkin(&self, checkin: Checkin) -> Result<Checkin, RosterError> {
        let mut state = self.state.lock();
        let key = (checkin.user, checkin.period, checkin.slot);
        Ok(state.checkins.entry(key).or_insert(checkin).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn booking(date: &str, hour: u8, user: u64) -> Booking {
        Booking {
            period: date.parse().unwrap(),
            slot: Slot::from_hour(hour).unwrap(),
            user: UserId(user),
            username: format!("user-{user}"),
            role: "member".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn insert_enforces_capacity_and_uniqueness() {
        let store = MemoryStore::new();
        assert_eq!(
            store.insert_booking(booking("2024-01-10", 14, 1), 2).unwrap(),
            InsertOutcome::Inserted
        );
        assert_eq!(
            store.insert_booking(booking("2024-01-10", 14, 1), 2).unwrap(),
            InsertOutcome::Duplicate
        );
        assert_eq!(
            store.insert_booking(booking("2024-01-10", 14, 2), 2).unwrap(),
            InsertOutcome::Inserted
        );
        assert_eq!(
            store.insert_booking(booking("2024-01-10", 14, 3), 2).unwrap(),
            InsertOutcome::CapacityExhausted
        );
        let date: PeriodDate = "2024-01-10".parse().unwrap();
        assert_eq!(
            store
                .bookings_for_slot(date, Slot::from_hour(14).unwrap())
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn delete_user_bookings_reports_removed_count() {
        let store = MemoryStore::new();
        store.insert_booking(booking("2024-01-10", 9, 1), 2).unwrap();
        store.insert_booking(booking("2024-01-10", 10, 1), 2).unwrap();
        store.insert_booking(booking("2024-01-10", 10, 2), 2).unwrap();

        let date: PeriodDate = "2024-01-10".parse().unwrap();
        assert_eq!(store.delete_user_bookings(date, UserId(1)).unwrap(), 2);
        assert_eq!(store.bookings_for_period(date).unwrap().len(), 1);
        // Second delete is a no-op.
        assert_eq!(store.delete_user_bookings(date, UserId(1)).unwrap(), 0);
    }

    #[test]
    fn clear_period_data_is_scoped_to_one_period() {
        let store = MemoryStore::new();
        store.insert_booking(booking("2024-01-10", 9, 1), 2).unwrap();
        store.insert_booking(booking("2024-01-11", 9, 1), 2).unwrap();
        let old: PeriodDate = "2024-01-10".parse().unwrap();
        let kept: PeriodDate = "2024-01-11".parse().unwrap();
        store.ensure_notification(old, Slot::from_hour(9).unwrap()).unwrap();
        store
            .upsert_checkin(Checkin {
                user: UserId(1),
                period: old,
                slot: Slot::from_hour(9).unwrap(),
                checked_in_at: Utc::now(),
            })
            .unwrap();

        store.clear_period_data(old).unwrap();

        assert!(store.bookings_for_period(old).unwrap().is_empty());
        assert_eq!(store.bookings_for_period(kept).unwrap().len(), 1);
        assert_eq!(store.notification_rows(), 0);
        assert!(store.checkins().is_empty());
    }

    #[test]
    fn checkin_upsert_keeps_first_timestamp() {
        let store = MemoryStore::new();
        let date: PeriodDate = "2024-01-10".parse().unwrap();
        let slot = Slot::from_hour(9).unwrap();
        let first = Checkin {
            user: UserId(1),
            period: date,
            slot,
            checked_in_at: Utc::now(),
        };
        let stored = store.upsert_checkin(first.clone()).unwrap();
        let mut later = first.clone();
        later.checked_in_at = first.checked_in_at + chrono::Duration::minutes(10);
        let again = store.upsert_checkin(later).unwrap();
        assert_eq!(again.checked_in_at, stored.checked_in_at);
        assert_eq!(store.checkins().len(), 1);
    }
}
