//! Search-string jobs and their lifecycle
//!
//! A job turns one input (pasted text, a website URL, or an uploaded PDF)
//! into a generated Boolean search string via a remote processing
//! function. The lifecycle is `new -> processing -> {completed | failed}`
//! with a user-initiated `canceled` side exit from any non-terminal
//! status. Terminal statuses have no outgoing transitions; retry is a
//! distinct operation that starts a new attempt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{CompanyId, JobId, UserId};

/// What the generated search string is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    /// Candidate sourcing
    Recruiting,
    /// Prospect sourcing
    LeadGeneration,
}

impl SearchKind {
    /// Stable wire name for the kind
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recruiting => "recruiting",
            Self::LeadGeneration => "lead_generation",
        }
    }
}

impl std::fmt::Display for SearchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a job's input came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    /// Pasted free text
    Text,
    /// A URL crawled remotely
    Website,
    /// An uploaded PDF
    Pdf,
}

impl InputSource {
    /// Stable wire name for the source
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Website => "website",
            Self::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a search-string job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Created, not yet dispatched
    New,
    /// Dispatched to a remote processor
    Processing,
    /// Output available
    Completed,
    /// Processing reported an error
    Failed,
    /// User gave up on the job
    Canceled,
}

impl JobStatus {
    /// Whether the status has no outgoing transitions
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Canceled)
    }

    /// Stable wire name for the status
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statuses a job may move to next
#[must_use]
pub fn allowed_transitions(from: JobStatus) -> Vec<JobStatus> {
    use JobStatus::*;
    match from {
        New => vec![Processing, Canceled],
        Processing => vec![Completed, Failed, Canceled],
        Completed | Failed | Canceled => vec![],
    }
}

/// Validates a lifecycle transition against the table.
pub fn validate_transition(from: JobStatus, to: JobStatus) -> Result<(), DomainError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(DomainError::IllegalTransition { from, to })
    }
}

/// Persisted search-string job record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStringJob {
    /// Opaque id, generated client-side
    pub id: JobId,
    /// Owning user
    pub user_id: UserId,
    /// Owning company, when submitted from a company portal
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    /// Recruiting or lead generation
    pub kind: SearchKind,
    /// Which input field is populated
    pub source: InputSource,
    /// Raw text input (source = text)
    #[serde(default)]
    pub input_text: Option<String>,
    /// URL input (source = website)
    #[serde(default)]
    pub input_url: Option<String>,
    /// Storage path of the uploaded PDF (source = pdf)
    #[serde(default)]
    pub input_pdf_path: Option<String>,
    /// Generated Boolean search string; only present once completed
    #[serde(default)]
    pub generated_string: Option<String>,
    /// Lifecycle status
    pub status: JobStatus,
    /// 0-100, monotone within one attempt; forced to 100 in every
    /// terminal write so the UI stops showing pending work
    pub progress: u8,
    /// Dispatch generation; bumped by retry, fences late write-backs
    #[serde(default = "first_attempt")]
    pub attempt: u32,
    /// Set together with `generated_string`
    #[serde(default)]
    pub is_processed: bool,
    /// Human-readable failure; only present while failed
    #[serde(default)]
    pub error: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last mutation time
    pub updated_at: DateTime<Utc>,
    /// Completion time
    #[serde(default)]
    pub processed_at: Option<DateTime<Utc>>,
}

fn first_attempt() -> u32 {
    1
}

impl SearchStringJob {
    /// The populated input field for the declared source
    #[must_use]
    pub fn input_for_source(&self) -> Option<&str> {
        match self.source {
            InputSource::Text => self.input_text.as_deref(),
            InputSource::Website => self.input_url.as_deref(),
            InputSource::Pdf => self.input_pdf_path.as_deref(),
        }
    }
}
