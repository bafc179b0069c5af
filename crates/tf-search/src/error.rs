//! Error types for the orchestrator

use tf_domain::{DomainError, InputSource};
use tf_remote::RemoteError;

/// Failures surfaced by the search-string orchestrator
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Rejected before any remote call
    #[error("invalid submission: {0}")]
    Validation(String),

    /// The declared source had no usable payload at dispatch time; the
    /// job was marked failed with this message
    #[error("{0}")]
    SourceMismatch(String),

    /// The remote processor answered, but without a usable result; the
    /// job was marked failed with this message
    #[error("processing failed: {0}")]
    Processing(String),

    /// Only text and website jobs can be retried; the uploaded blob of a
    /// pdf job is not re-sent automatically
    #[error("{0} jobs cannot be retried")]
    RetryUnsupported(InputSource),

    /// The original input field is gone; nothing to resubmit
    #[error("original {0} input is missing, cannot retry")]
    MissingInput(InputSource),

    /// The remote call itself failed; for dispatch paths the job record
    /// was additionally marked failed before this surfaced
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// A lifecycle write would have broken the transition table
    #[error(transparent)]
    Domain(#[from] DomainError),
}
