//! Talentflow Domain Types
//!
//! Typed records and pure view projections shared by the pipeline board
//! and the search-string flow.
//!
//! # Core Concepts
//!
//! - [`WorkItem`]: a pipeline project plus its derived board state
//! - [`Stage`] / [`ProjectStatus`]: presentation bucket vs persisted status
//! - [`SearchStringJob`]: lifecycle record for generated search strings
//! - [`validate_transition`]: the job lifecycle transition table
//!
//! Everything in this crate is pure: no I/O, no clocks. Callers pass
//! `now` explicitly wherever recency matters.

#![warn(unreachable_pub)]

// Core modules
mod company;
mod error;
mod ids;
mod project;
mod search_job;
mod stage;

// Re-exports
pub use company::Company;
pub use error::DomainError;
pub use ids::{CompanyId, JobId, ProjectId, UserId};
pub use project::{is_recent, ProjectRecord, ViewerScope, WorkItem};
pub use search_job::{
    allowed_transitions, validate_transition, InputSource, JobStatus, SearchKind, SearchStringJob,
};
pub use stage::{ProjectStatus, Stage};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
