//! Error types for roster operations.

use thiserror::Error;

/// Errors produced by roster components.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Malformed user input (bad hour, bad date, invalid range).
    #[error("validation error: {0}")]
    Validation(String),
    /// The slot already holds its configured number of occupants.
    #[error("slot {slot} on {date} is full")]
    SlotFull {
        /// Period date the rejected booking targeted.
        date: String,
        /// Slot label the rejected booking targeted.
        slot: String,
    },
    /// The user already holds a booking for this (period, slot).
    #[error("duplicate booking")]
    DuplicateBooking,
    /// Referenced period or session does not exist (or was already consumed).
    #[error("not found: {0}")]
    NotFound(String),
    /// Storage backend failure with context.
    #[error("persistence error: {0}")]
    Persistence(String),
    /// Downstream chat gateway failure with context.
    #[error("gateway error: {0}")]
    Gateway(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
