//! Capacity-constrained booking ledger.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::config::ConfigHandle;
use crate::core::model::{
    Booking, CommitOutcome, PeriodDate, PeriodStatus, RosterEntry, RosterView, Slot,
    SlotAvailability, UserId,
};
use crate::core::store::{InsertOutcome, RosterStore};
use crate::core::RosterError;
use crate::util::clock;

/// Assignment store enforcing the per-slot occupancy limit.
///
/// Every mutation is a best-effort batch: each requested slot is attempted
/// independently and reports its own outcome, with no cross-slot rollback.
/// The capacity invariant itself is enforced by the store's conditional
/// insert, which the ledger never bypasses.
pub struct BookingLedger {
    store: Arc<dyn RosterStore>,
    config: ConfigHandle,
}

impl BookingLedger {
    /// Create a ledger over a store, reading limits from the config handle.
    pub fn new(store: Arc<dyn RosterStore>, config: ConfigHandle) -> Self {
        Self { store, config }
    }

    fn active_period(&self, date: PeriodDate) -> Result<(), RosterError> {
        match self.store.get_period(date)? {
            Some(p) if p.status == PeriodStatus::Active => Ok(()),
            Some(_) => Err(RosterError::NotFound(format!("period {date} is retired"))),
            None => Err(RosterError::NotFound(format!("no period for {date}"))),
        }
    }

    /// Read-only occupancy snapshot over all 24 slots of a period.
    pub fn availability(
        &self,
        date: PeriodDate,
    ) -> Result<BTreeMap<Slot, SlotAvailability>, RosterError> {
        self.active_period(date)?;
        let capacity = self.config.snapshot().capacity_per_slot;

        let mut counts: BTreeMap<Slot, u32> = BTreeMap::new();
        for booking in self.store.bookings_for_period(date)? {
            *counts.entry(booking.slot).or_default() += 1;
        }

        Ok(Slot::all()
            .map(|slot| {
                let count = counts.get(&slot).copied().unwrap_or(0);
                (slot, SlotAvailability { count, capacity })
            })
            .collect())
    }

    /// Commit a batch of slots for one user. Each slot reports its own
    /// outcome; siblings in the batch are unaffected by a full slot.
    pub fn commit(
        &self,
        date: PeriodDate,
        user: UserId,
        username: &str,
        role: &str,
        slots: &BTreeSet<Slot>,
    ) -> Result<BTreeMap<Slot, CommitOutcome>, RosterError> {
        self.active_period(date)?;
        let capacity = self.config.snapshot().capacity_per_slot;

        let mut outcomes = BTreeMap::new();
        for &slot in slots {
            let booking = Booking {
                period: date,
                slot,
                user,
                username: username.to_string(),
                role: role.to_string(),
                created_at: clock::now(),
            };
            let outcome = match self.store.insert_booking(booking, capacity)? {
                InsertOutcome::Inserted => {
                    tracing::info!(%date, %slot, %user, "booking committed");
                    CommitOutcome::Booked
                }
                InsertOutcome::Duplicate => CommitOutcome::AlreadyBooked,
                InsertOutcome::CapacityExhausted => {
                    tracing::warn!(%date, %slot, %user, "slot full, booking rejected");
                    CommitOutcome::SlotFull
                }
            };
            outcomes.insert(slot, outcome);
        }
        Ok(outcomes)
    }

    /// Delete every booking the user holds in the period; returns the count.
    pub fn cancel_all(&self, date: PeriodDate, user: UserId) -> Result<usize, RosterError> {
        self.active_period(date)?;
        let removed = self.store.delete_user_bookings(date, user)?;
        if removed > 0 {
            tracing::info!(%date, %user, removed, "bookings cancelled");
        }
        Ok(removed)
    }

    /// Replace the user's entire slot set in the period with one new slot.
    pub fn edit(
        &self,
        date: PeriodDate,
        user: UserId,
        username: &str,
        new_slot: Slot,
        role: &str,
    ) -> Result<CommitOutcome, RosterError> {
        self.cancel_all(date, user)?;
        let slots = BTreeSet::from([new_slot]);
        let outcomes = self.commit(date, user, username, role, &slots)?;
        // The batch held exactly one slot.
        Ok(outcomes
            .get(&new_slot)
            .copied()
            .unwrap_or(CommitOutcome::SlotFull))
    }

    /// Per-slot occupant listing for the rendering layer.
    pub fn roster_view(&self, date: PeriodDate) -> Result<RosterView, RosterError> {
        self.active_period(date)?;
        let mut slots: BTreeMap<Slot, Vec<RosterEntry>> = BTreeMap::new();
        for booking in self.store.bookings_for_period(date)? {
            slots.entry(booking.slot).or_default().push(RosterEntry {
                username: booking.username,
                role: booking.role,
            });
        }
        Ok(RosterView { date, slots })
    }
}
