//! Chat gateway implementations.

/// Recording in-memory gateway.
pub mod memory;

pub use memory::{RecordingGateway, SentMessage};
