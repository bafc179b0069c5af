//! Search-String Processing Orchestrator
//!
//! Creates [`tf_domain::SearchStringJob`] records, routes them to the
//! source-specific remote processor, and tracks their lifecycle to a
//! terminal status:
//!
//! - *text* completes synchronously within the dispatch call,
//! - *website* and *pdf* are started here and finished out-of-band by the
//!   remote processor through a write-back,
//! - cancellation is advisory and never stops in-flight remote work,
//! - a generation counter fences late write-backs so a canceled or
//!   retried job is not resurrected by a stale result.

#![warn(unreachable_pub)]

mod config;
mod error;
mod input;
mod orchestrator;
mod preview;

pub use config::SearchConfig;
pub use error::SearchError;
pub use input::JobInput;
pub use orchestrator::{SearchStrings, WriteBack};
pub use preview::preview;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
