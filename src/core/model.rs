//! Shared data model: period/slot addressing, bookings, and emitted events.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::RosterError;

/// Number of fixed hourly slots in a period.
pub const SLOTS_PER_PERIOD: u8 = 24;

/// Platform user identity, already authorized by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a chat channel surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a message within a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

/// Calendar date identifying a period. ISO-8601 ordering is chronological.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PeriodDate(pub NaiveDate);

impl PeriodDate {
    /// Period containing the given instant (UTC).
    pub fn containing(at: DateTime<Utc>) -> Self {
        Self(at.date_naive())
    }

    /// Period `days` days after this one.
    pub fn plus_days(self, days: u64) -> Self {
        Self(self.0.checked_add_days(Days::new(days)).unwrap_or(self.0))
    }
}

impl fmt::Display for PeriodDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // NaiveDate renders %Y-%m-%d, the canonical period key.
        write!(f, "{}", self.0)
    }
}

impl FromStr for PeriodDate {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| RosterError::Validation(format!("invalid period date: {s}")))
    }
}

/// One fixed hourly slot within a period, addressed by its starting hour.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct Slot(u8);

impl Slot {
    /// Build a slot from an hour in `0..24`.
    pub fn from_hour(hour: u8) -> Result<Self, RosterError> {
        if hour < SLOTS_PER_PERIOD {
            Ok(Self(hour))
        } else {
            Err(RosterError::Validation(format!("invalid hour: {hour}")))
        }
    }

    /// Starting hour of the slot.
    pub fn hour(self) -> u8 {
        self.0
    }

    /// All 24 slots of a period, in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..SLOTS_PER_PERIOD).map(Self)
    }

    /// Inclusive slot sequence `[start..=end]`; `end < start` is rejected.
    pub fn range_inclusive(start: Self, end: Self) -> Result<Vec<Self>, RosterError> {
        if end.0 < start.0 {
            return Err(RosterError::Validation(format!(
                "end time {end} must not be before start time {start}"
            )));
        }
        Ok((start.0..=end.0).map(Self).collect())
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

impl FromStr for Slot {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept "9", "09", and the canonical "09:00" label.
        let hour_part = s.trim().split(':').next().unwrap_or_default();
        let hour: u8 = hour_part
            .parse()
            .map_err(|_| RosterError::Validation(format!("invalid slot: {s}")))?;
        Self::from_hour(hour)
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        slot.to_string()
    }
}

impl TryFrom<String> for Slot {
    type Error = RosterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Lifecycle status of a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    /// Period is inside the rolling window and accepts bookings.
    Active,
    /// Period fell behind the window and is being torn down.
    Retired,
}

/// A single day's booking window and its display surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Period {
    /// Calendar date identifying the period.
    pub date: PeriodDate,
    /// Lifecycle status.
    pub status: PeriodStatus,
    /// Channel created for this period, once provisioned.
    pub channel: Option<ChannelId>,
    /// Pinned roster message inside the channel, once posted.
    pub roster_message: Option<MessageId>,
}

/// A confirmed assignment of one user to one (period, slot).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Period the booking belongs to.
    pub period: PeriodDate,
    /// Hourly slot within the period.
    pub slot: Slot,
    /// Booked user.
    pub user: UserId,
    /// Display name captured at booking time, for roster rendering.
    pub username: String,
    /// Role label the user signed up under.
    pub role: String,
    /// When the booking was committed.
    pub created_at: DateTime<Utc>,
}

/// A user-confirmed arrival record for a booked slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkin {
    /// User who checked in.
    pub user: UserId,
    /// Period of the shift.
    pub period: PeriodDate,
    /// Slot of the shift.
    pub slot: Slot,
    /// When the arrival was first recorded.
    pub checked_in_at: DateTime<Utc>,
}

/// Occupancy snapshot for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAvailability {
    /// Current number of bookings.
    pub count: u32,
    /// Configured maximum occupants.
    pub capacity: u32,
}

/// Per-slot result of a batch commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitOutcome {
    /// The booking was inserted.
    Booked,
    /// The user already held a booking for this slot; ledger unchanged.
    AlreadyBooked,
    /// The slot was at capacity; ledger unchanged.
    SlotFull,
}

impl CommitOutcome {
    /// Translate a per-slot outcome into the matching error, for single-slot
    /// flows that treat anything but a fresh booking as a failure.
    pub fn into_result(self, date: PeriodDate, slot: Slot) -> Result<(), RosterError> {
        match self {
            Self::Booked => Ok(()),
            Self::AlreadyBooked => Err(RosterError::DuplicateBooking),
            Self::SlotFull => Err(RosterError::SlotFull {
                date: date.to_string(),
                slot: slot.to_string(),
            }),
        }
    }
}

/// One rendered roster line: who is booked, under which role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Display name of the booked user.
    pub username: String,
    /// Role label of the booking.
    pub role: String,
}

/// Per-slot occupant listing for a period, for the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterView {
    /// Period the view describes.
    pub date: PeriodDate,
    /// Occupants per slot; slots with no bookings are omitted.
    pub slots: BTreeMap<Slot, Vec<RosterEntry>>,
}

/// Period lifecycle event emitted by rotation, for the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationEvent {
    /// A new period entered the rolling window.
    PeriodCreated(PeriodDate),
    /// A period fell behind the window and was torn down.
    PeriodRetired(PeriodDate),
}

/// One booked attendee inside a notification event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    /// Booked user.
    pub user: UserId,
    /// Role label of the booking.
    pub role: String,
}

/// Aggregated pre-shift notification for one (period, slot).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Unique identifier of this emission.
    pub event_id: Uuid,
    /// Period of the upcoming shift.
    pub date: PeriodDate,
    /// Slot of the upcoming shift.
    pub slot: Slot,
    /// Every booked (user, role) pair for the slot.
    pub attendees: Vec<Attendee>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_labels_are_zero_padded() {
        let slot = Slot::from_hour(9).unwrap();
        assert_eq!(slot.to_string(), "09:00");
        assert_eq!(Slot::from_hour(23).unwrap().to_string(), "23:00");
    }

    #[test]
    fn slot_parses_bare_and_labeled_hours() {
        assert_eq!("9".parse::<Slot>().unwrap().hour(), 9);
        assert_eq!("09".parse::<Slot>().unwrap().hour(), 9);
        assert_eq!("09:00".parse::<Slot>().unwrap().hour(), 9);
        assert!("24".parse::<Slot>().is_err());
        assert!("half past nine".parse::<Slot>().is_err());
    }

    #[test]
    fn slot_range_is_inclusive() {
        let start = Slot::from_hour(9).unwrap();
        let end = Slot::from_hour(11).unwrap();
        let range = Slot::range_inclusive(start, end).unwrap();
        assert_eq!(
            range.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["09:00", "10:00", "11:00"]
        );
    }

    #[test]
    fn slot_range_rejects_inverted_bounds() {
        let start = Slot::from_hour(11).unwrap();
        let end = Slot::from_hour(9).unwrap();
        assert!(matches!(
            Slot::range_inclusive(start, end),
            Err(RosterError::Validation(_))
        ));
    }

    #[test]
    fn period_date_roundtrips_iso() {
        let date: PeriodDate = "2024-01-10".parse().unwrap();
        assert_eq!(date.to_string(), "2024-01-10");
        assert!("01/10/2024".parse::<PeriodDate>().is_err());
    }

    #[test]
    fn period_date_ordering_matches_chronology() {
        let a: PeriodDate = "2024-01-10".parse().unwrap();
        let b: PeriodDate = "2024-01-11".parse().unwrap();
        assert!(a < b);
        assert_eq!(a.plus_days(1), b);
    }

    #[test]
    fn commit_outcomes_translate_to_errors() {
        let date: PeriodDate = "2024-01-10".parse().unwrap();
        let slot = Slot::from_hour(14).unwrap();
        assert!(CommitOutcome::Booked.into_result(date, slot).is_ok());
        assert!(matches!(
            CommitOutcome::AlreadyBooked.into_result(date, slot),
            Err(RosterError::DuplicateBooking)
        ));
        assert!(matches!(
            CommitOutcome::SlotFull.into_result(date, slot),
            Err(RosterError::SlotFull { .. })
        ));
    }

    #[test]
    fn slot_serializes_as_label() {
        let slot = Slot::from_hour(14).unwrap();
        assert_eq!(serde_json::to_string(&slot).unwrap(), "\"14:00\"");
        let back: Slot = serde_json::from_str("\"14:00\"").unwrap();
        assert_eq!(back, slot);
    }
}
