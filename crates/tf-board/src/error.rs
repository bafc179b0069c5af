//! Error types for the board crate

use tf_domain::ProjectId;
use tf_remote::RemoteError;

/// Failures surfaced by the pipeline board
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// The collection read failed; the in-memory list is untouched
    #[error("failed to load pipeline: {0}")]
    Load(#[source] RemoteError),

    /// The status write failed; the board was reverted to its pre-change
    /// snapshot and the cached collection invalidated
    #[error("failed to persist stage change: {0}")]
    Persist(#[source] RemoteError),

    /// The addressed item is not on the board
    #[error("unknown pipeline item: {0}")]
    UnknownItem(ProjectId),
}
