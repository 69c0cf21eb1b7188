//! Roster configuration: validated snapshots and the atomically swappable handle.

use std::sync::Arc;

use anyhow::Context;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::core::AppResult;
use crate::core::model::ChannelId;

/// Environment variable naming the JSON config file.
pub const CONFIG_PATH_VAR: &str = "ROSTER_CONFIG";

fn default_capacity() -> u32 {
    2
}

fn default_lead_minutes() -> i64 {
    5
}

fn default_window_days() -> u32 {
    7
}

fn default_selection_ttl() -> i64 {
    15
}

fn default_role() -> String {
    "member".to_string()
}

/// Immutable roster configuration snapshot.
///
/// Components hold a [`ConfigHandle`] and take one snapshot per operation;
/// the snapshot is never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Maximum concurrent occupants per (period, slot).
    #[serde(default = "default_capacity")]
    pub capacity_per_slot: u32,
    /// Minutes before a slot's start at which the notification fires.
    #[serde(default = "default_lead_minutes")]
    pub lead_minutes: i64,
    /// Number of days in the rolling period window, today inclusive.
    #[serde(default = "default_window_days")]
    pub rolling_window_days: u32,
    /// Minutes of inactivity after which a selection session is swept.
    #[serde(default = "default_selection_ttl")]
    pub selection_ttl_minutes: i64,
    /// Category channel under which per-period channels are created.
    pub schedule_category: ChannelId,
    /// Channel receiving aggregated pre-shift notifications.
    pub notification_channel: ChannelId,
    /// Role label applied to new bookings.
    #[serde(default = "default_role")]
    pub default_role: String,
}

impl RosterConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity_per_slot == 0 {
            return Err("capacity_per_slot must be greater than 0".into());
        }
        if self.rolling_window_days == 0 {
            return Err("rolling_window_days must be greater than 0".into());
        }
        if self.lead_minutes < 0 {
            return Err("lead_minutes must not be negative".into());
        }
        if self.selection_ttl_minutes <= 0 {
            return Err("selection_ttl_minutes must be greater than 0".into());
        }
        if self.default_role.trim().is_empty() {
            return Err("default_role must not be empty".into());
        }
        Ok(())
    }

    /// Parse roster configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the file named by `ROSTER_CONFIG`.
    ///
    /// Call [`crate::util::telemetry::init_env`] first if the variable lives
    /// in a `.env` file.
    pub fn from_env() -> AppResult<Self> {
        let path = std::env::var(CONFIG_PATH_VAR)
            .with_context(|| format!("{CONFIG_PATH_VAR} is not set"))?;
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config file {path}"))?;
        Self::from_json_str(&raw).map_err(|e| anyhow::anyhow!("config invalid: {e}"))
    }
}

/// Shared handle to the current configuration snapshot.
///
/// Reload builds a fresh [`RosterConfig`] and swaps the single reference;
/// readers that already took a snapshot keep seeing their old one.
#[derive(Clone)]
pub struct ConfigHandle {
    current: Arc<RwLock<Arc<RosterConfig>>>,
}

impl ConfigHandle {
    /// Wrap an initial snapshot.
    pub fn new(cfg: RosterConfig) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(cfg))),
        }
    }

    /// Current snapshot. Cheap; clones an `Arc`.
    pub fn snapshot(&self) -> Arc<RosterConfig> {
        Arc::clone(&self.current.read())
    }

    /// Atomically replace the current snapshot.
    pub fn swap(&self, cfg: RosterConfig) {
        *self.current.write() = Arc::new(cfg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_json() -> &'static str {
        r#"{"schedule_category": 100, "notification_channel": 200}"#
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let cfg = RosterConfig::from_json_str(minimal_json()).unwrap();
        assert_eq!(cfg.capacity_per_slot, 2);
        assert_eq!(cfg.lead_minutes, 5);
        assert_eq!(cfg.rolling_window_days, 7);
        assert_eq!(cfg.selection_ttl_minutes, 15);
        assert_eq!(cfg.default_role, "member");
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let raw = r#"{"schedule_category": 1, "notification_channel": 2, "capacity_per_slot": 0}"#;
        assert!(RosterConfig::from_json_str(raw).is_err());
    }

    #[test]
    fn handle_swap_replaces_snapshot_for_new_readers() {
        let handle = ConfigHandle::new(RosterConfig::from_json_str(minimal_json()).unwrap());
        let before = handle.snapshot();

        let mut next = RosterConfig::from_json_str(minimal_json()).unwrap();
        next.capacity_per_slot = 5;
        handle.swap(next);

        assert_eq!(before.capacity_per_slot, 2);
        assert_eq!(handle.snapshot().capacity_per_slot, 5);
    }
}
