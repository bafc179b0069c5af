//! Typed access to the search-string jobs collection

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use tf_domain::{JobId, JobStatus, SearchStringJob, UserId};

use crate::error::RemoteError;
use crate::store::{Filter, RemoteStore};

/// Collection holding search-string jobs
pub const SEARCH_JOBS_TABLE: &str = "search_string_jobs";

/// Partial update body for a job row.
///
/// Unset fields are not serialized and stay untouched on the service
/// side; double-option fields serialize `Some(None)` as an explicit null
/// to clear a column.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobPatch {
    /// New lifecycle status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    /// New progress value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    /// New dispatch generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt: Option<u32>,
    /// Generated output; `Some(None)` clears it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_string: Option<Option<String>>,
    /// Failure text; `Some(None)` clears it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Option<String>>,
    /// Processed flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_processed: Option<bool>,
    /// Storage path of the uploaded PDF
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_pdf_path: Option<String>,
    /// Completion time; `Some(None)` clears it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<Option<DateTime<Utc>>>,
    /// Mutation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl JobPatch {
    /// An empty patch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lifecycle status
    #[must_use]
    pub fn status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the progress value
    #[must_use]
    pub fn progress(mut self, progress: u8) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Set the dispatch generation
    #[must_use]
    pub fn attempt(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }

    /// Set the generated output
    #[must_use]
    pub fn generated_string(mut self, generated: impl Into<String>) -> Self {
        self.generated_string = Some(Some(generated.into()));
        self
    }

    /// Clear any previous output
    #[must_use]
    pub fn clear_generated_string(mut self) -> Self {
        self.generated_string = Some(None);
        self
    }

    /// Record failure text
    #[must_use]
    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(Some(error.into()));
        self
    }

    /// Clear any previous failure text
    #[must_use]
    pub fn clear_error(mut self) -> Self {
        self.error = Some(None);
        self
    }

    /// Set the processed flag
    #[must_use]
    pub fn is_processed(mut self, processed: bool) -> Self {
        self.is_processed = Some(processed);
        self
    }

    /// Set the stored PDF path
    #[must_use]
    pub fn input_pdf_path(mut self, path: impl Into<String>) -> Self {
        self.input_pdf_path = Some(path.into());
        self
    }

    /// Set the completion time
    #[must_use]
    pub fn processed_at(mut self, at: DateTime<Utc>) -> Self {
        self.processed_at = Some(Some(at));
        self
    }

    /// Set the mutation time
    #[must_use]
    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }
}

/// Repository for search-string job rows
pub struct SearchJobStore {
    store: Arc<dyn RemoteStore>,
}

impl SearchJobStore {
    /// Create a repository over the given adapter
    #[inline]
    #[must_use]
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Insert a freshly created job, returning the stored row
    pub async fn insert_new(&self, job: &SearchStringJob) -> Result<SearchStringJob, RemoteError> {
        let row = self
            .store
            .insert(SEARCH_JOBS_TABLE, serde_json::to_value(job)?)
            .await?;
        Ok(serde_json::from_value(row)?)
    }

    /// Reload one job by id
    pub async fn fetch(&self, id: &JobId) -> Result<SearchStringJob, RemoteError> {
        let rows = self
            .store
            .select(SEARCH_JOBS_TABLE, &Filter::new().eq("id", id.as_str()))
            .await?;
        let row = rows.into_iter().next().ok_or_else(|| RemoteError::NotFound {
            table: SEARCH_JOBS_TABLE.to_string(),
            id: id.to_string(),
        })?;
        Ok(serde_json::from_value(row)?)
    }

    /// Every job owned by the user, newest first
    pub async fn list_for_user(&self, user: &UserId) -> Result<Vec<SearchStringJob>, RemoteError> {
        let filter = Filter::new()
            .eq("user_id", user.as_str())
            .order_desc("created_at");
        let rows = self.store.select(SEARCH_JOBS_TABLE, &filter).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(RemoteError::from))
            .collect()
    }

    /// Apply a partial update to one job row
    pub async fn patch(&self, id: &JobId, patch: &JobPatch) -> Result<(), RemoteError> {
        self.store
            .update(SEARCH_JOBS_TABLE, id.as_str(), serde_json::to_value(patch)?)
            .await
    }
}
