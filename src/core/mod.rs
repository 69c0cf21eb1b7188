//! Core roster components: data model, ledger, sessions, and background contracts.

/// Shift arrival log.
pub mod checkin;
/// Error types for roster operations.
pub mod error;
/// Chat gateway boundary.
pub mod gateway;
/// Capacity-constrained booking ledger.
pub mod ledger;
/// Shared data model and validation.
pub mod model;
/// Pre-shift notification emitter.
pub mod notify;
/// Rolling-window period lifecycle.
pub mod rotation;
/// Multi-step selection sessions.
pub mod session;
/// Storage contract for roster state.
pub mod store;

pub use checkin::CheckinTracker;
pub use error::{AppResult, RosterError};
pub use gateway::{ChatGateway, MessageContent};
pub use ledger::BookingLedger;
pub use model::{
    Attendee, Booking, ChannelId, Checkin, CommitOutcome, MessageId, NotificationEvent, Period,
    PeriodDate, PeriodStatus, RosterEntry, RosterView, RotationEvent, Slot, SlotAvailability,
    UserId,
};
pub use notify::NotificationScheduler;
pub use rotation::DailyPeriodManager;
pub use session::{SessionManager, SessionSnapshot, SessionState};
pub use store::{InsertOutcome, RosterStore};
