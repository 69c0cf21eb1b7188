//! Configuration models for the roster subsystem.

/// Roster configuration snapshot and handle.
pub mod roster;

pub use roster::{ConfigHandle, RosterConfig, CONFIG_PATH_VAR};
