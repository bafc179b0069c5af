//! Error types for the domain crate

use crate::search_job::JobStatus;

/// Domain invariant violations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Attempted job lifecycle transition outside the table
    #[error("illegal job transition: {from} -> {to}")]
    IllegalTransition {
        /// Current status
        from: JobStatus,
        /// Requested status
        to: JobStatus,
    },
}
