//! Shared utilities.

/// Clock helpers for period and slot arithmetic.
pub mod clock;
/// Telemetry helpers for structured logging and tracing.
pub mod telemetry;

pub use clock::{floor_to_hour, now, plus_minutes, today};
pub use telemetry::{init_env, init_tracing};
