//! Clock helpers for period and slot arithmetic.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};

/// Current UTC instant.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Calendar date (UTC) containing an instant.
pub fn today(at: DateTime<Utc>) -> NaiveDate {
    at.date_naive()
}

/// Truncate an instant to the top of its hour.
pub fn floor_to_hour(at: DateTime<Utc>) -> DateTime<Utc> {
    at.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(at)
}

/// Shift an instant forward by a whole number of minutes.
pub fn plus_minutes(at: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    at + Duration::minutes(minutes)
}
