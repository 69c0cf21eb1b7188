//! # Shift Roster
//!
//! A capacity-aware shift roster scheduler for community servers.
//!
//! This library coordinates time-bounded resource bookings: a rolling window of
//! daily periods, each divided into 24 fixed hourly slots with a bounded number
//! of concurrent occupants. Background jobs rotate the window, fire pre-shift
//! notifications, and record check-ins.
//!
//! ## Core Problem Solved
//!
//! Volunteer shift rosters look simple until two people race for the last open
//! seat of an hour:
//!
//! - **Bounded occupancy**: every (period, slot) holds at most a configured
//!   number of bookings, even under concurrent commits
//! - **Rolling lifecycle**: periods appear a week ahead and are torn down,
//!   with all dependent records, once their date passes
//! - **At-most-once alerts**: each slot's pre-shift notification fires exactly
//!   once, guarded by a persisted `sent` flag
//! - **Interactive selection**: users assemble a booking step by step (date,
//!   hour range or discrete picks) before committing it as a batch
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use shift_roster::builders::{build_roster, start_background_jobs};
//! use shift_roster::config::RosterConfig;
//! use shift_roster::infra::{MemoryStore, RecordingGateway};
//! use shift_roster::runtime::TokioSpawner;
//!
//! let cfg = RosterConfig::from_env()?;
//! let service = build_roster(cfg, Arc::new(MemoryStore::new()), Arc::new(RecordingGateway::new()))?;
//! let jobs = start_background_jobs(&service, &TokioSpawner::current());
//!
//! // User-facing calls go through service.sessions / service.ledger;
//! // stop background work through the returned job handles.
//! ```
//!
//! The capacity check and the booking insert are one conditional write inside
//! the storage backend ([`core::store::RosterStore::insert_booking`]); see
//! `tests/` for the racing-commit coverage.

/// Builders to construct wired roster services from configuration.
pub mod builders;
/// Configuration models for the roster subsystem.
pub mod config;
/// Core roster components: model, ledger, sessions, rotation, notifications, check-ins.
pub mod core;
/// Infrastructure adapters for storage backends and the chat gateway.
pub mod infra;
/// Runtime adapters: task spawning and the periodic job harness.
pub mod runtime;
/// Shared utilities.
pub mod util;
