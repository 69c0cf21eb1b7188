//! Builders to construct wired roster services from configuration.

/// Roster service wiring.
pub mod roster_builder;

pub use roster_builder::{build_roster, start_background_jobs, RosterService};
