//! Pipeline Board State Container
//!
//! Owns the in-memory list of pipeline work items for the current viewer
//! and performs stage changes with optimistic consistency:
//!
//! 1. the card moves locally before the network round-trip,
//! 2. the new status is persisted,
//! 3. on failure the entire pre-change list snapshot is restored and the
//!    cached collection is invalidated so the next load re-reads the
//!    remote truth.
//!
//! Moves between columns that share one persisted status (the
//! `in_progress` fan-out) are display-only and never touch the network.

#![warn(unreachable_pub)]

mod board;
mod config;
mod error;

pub use board::{PipelineBoard, StageChange};
pub use config::BoardConfig;
pub use error::BoardError;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
