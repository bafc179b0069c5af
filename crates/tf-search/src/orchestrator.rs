//! The orchestrator itself

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use tf_cache::ViewCache;
use tf_domain::{
    validate_transition, CompanyId, InputSource, JobId, JobStatus, SearchKind, SearchStringJob,
    UserId,
};
use tf_remote::{JobPatch, RemoteStore, SearchJobStore};

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::input::JobInput;

/// Outcome of an out-of-band write-back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteBack {
    /// The result was recorded on the job
    Applied,
    /// The job had moved on (terminal status or a newer attempt) and the
    /// result was dropped without error
    Ignored,
}

/// Orchestrates search-string jobs from submission to a terminal status
///
/// All status writes for one job are issued sequentially by one call
/// chain; the only concurrent writer is the out-of-band remote processor,
/// whose write-backs come through [`SearchStrings::record_completion`] /
/// [`SearchStrings::record_failure`] and are fenced by the job's attempt
/// counter.
pub struct SearchStrings {
    store: Arc<dyn RemoteStore>,
    jobs: SearchJobStore,
    cache: ViewCache,
    config: SearchConfig,
}

impl SearchStrings {
    /// Create an orchestrator over the given adapter and cache
    #[must_use]
    pub fn new(store: Arc<dyn RemoteStore>, cache: ViewCache) -> Self {
        Self::with_config(store, cache, SearchConfig::default())
    }

    /// Create an orchestrator with explicit endpoint names
    #[must_use]
    pub fn with_config(store: Arc<dyn RemoteStore>, cache: ViewCache, config: SearchConfig) -> Self {
        Self {
            jobs: SearchJobStore::new(store.clone()),
            store,
            cache,
            config,
        }
    }

    /// Validate a submission, create the job, and dispatch it.
    ///
    /// Rejections (missing owner, empty payload) happen before any
    /// network call; no record is created for them. Dispatch failures are
    /// recorded on the job *and* returned, so neither side swallows them;
    /// the created job can still be re-fetched by id afterwards.
    pub async fn submit(
        &self,
        user: &UserId,
        company: Option<CompanyId>,
        kind: SearchKind,
        input: JobInput,
    ) -> Result<SearchStringJob, SearchError> {
        if user.is_empty() {
            return Err(SearchError::Validation(
                "missing authenticated user".to_string(),
            ));
        }
        input.validate()?;

        let id = JobId::new();
        let now = Utc::now();
        let mut job = SearchStringJob {
            id: id.clone(),
            user_id: user.clone(),
            company_id: company,
            kind,
            source: input.source(),
            input_text: None,
            input_url: None,
            input_pdf_path: None,
            generated_string: None,
            status: JobStatus::New,
            progress: 0,
            attempt: 1,
            is_processed: false,
            error: None,
            created_at: now,
            updated_at: now,
            processed_at: None,
        };
        match &input {
            JobInput::Text(text) => job.input_text = Some(text.clone()),
            JobInput::Website(url) => job.input_url = Some(url.clone()),
            // The storage path is fixed up front so the record satisfies
            // the one-populated-input rule before the upload happens
            JobInput::Pdf { filename, .. } => {
                job.input_pdf_path = Some(format!("{id}/{filename}"));
            }
        }

        let mut job = self.jobs.insert_new(&job).await?;
        self.invalidate_user(&job.user_id).await;
        tracing::info!(job = %job.id, kind = %job.kind, source = %job.source, "search-string job submitted");

        self.dispatch(&mut job, input).await?;
        Ok(job)
    }

    /// Reload one job by id
    pub async fn fetch(&self, id: &JobId) -> Result<SearchStringJob, SearchError> {
        Ok(self.jobs.fetch(id).await?)
    }

    /// Every job owned by the user, newest first, through the view cache
    pub async fn list_for_user(&self, user: &UserId) -> Result<Vec<SearchStringJob>, SearchError> {
        let key = user_key(user);
        if let Some(jobs) = self.cache.get::<Vec<SearchStringJob>>(&key).await {
            tracing::debug!(%key, "job list served from cache");
            return Ok(jobs);
        }
        let jobs = self.jobs.list_for_user(user).await?;
        self.cache.insert(key, jobs.clone()).await;
        Ok(jobs)
    }

    /// Mark the job canceled, unconditionally.
    ///
    /// Advisory only: in-flight remote work is not stopped. A processor
    /// that finishes anyway reports through the write-back methods, where
    /// the terminal status makes its result a no-op.
    pub async fn cancel(&self, id: &JobId) -> Result<SearchStringJob, SearchError> {
        let mut job = self.jobs.fetch(id).await?;
        let now = Utc::now();
        let patch = JobPatch::new().status(JobStatus::Canceled).updated_at(now);
        self.jobs.patch(id, &patch).await?;
        job.status = JobStatus::Canceled;
        job.updated_at = now;
        self.invalidate_user(&job.user_id).await;
        tracing::info!(job = %id, "search-string job canceled");
        Ok(job)
    }

    /// Start a new attempt for a failed or stuck job.
    ///
    /// Defined for text and website sources only, since the uploaded blob
    /// of a pdf job is not re-sent automatically. The original input must
    /// still be present on the record; it is resubmitted under a bumped
    /// attempt counter, which fences out any write-back still in flight
    /// from the previous attempt.
    pub async fn retry(&self, id: &JobId) -> Result<SearchStringJob, SearchError> {
        let mut job = self.jobs.fetch(id).await?;
        let input = match job.source {
            InputSource::Pdf => return Err(SearchError::RetryUnsupported(InputSource::Pdf)),
            InputSource::Text => JobInput::Text(
                job.input_text
                    .clone()
                    .ok_or(SearchError::MissingInput(InputSource::Text))?,
            ),
            InputSource::Website => JobInput::Website(
                job.input_url
                    .clone()
                    .ok_or(SearchError::MissingInput(InputSource::Website))?,
            ),
        };

        let now = Utc::now();
        job.attempt += 1;
        let patch = JobPatch::new()
            .status(JobStatus::New)
            .progress(0)
            .attempt(job.attempt)
            .clear_error()
            .clear_generated_string()
            .is_processed(false)
            .updated_at(now);
        self.jobs.patch(id, &patch).await?;
        job.status = JobStatus::New;
        job.progress = 0;
        job.error = None;
        job.generated_string = None;
        job.is_processed = false;
        job.updated_at = now;
        self.invalidate_user(&job.user_id).await;
        tracing::info!(job = %id, attempt = job.attempt, "retrying search-string job");

        self.dispatch(&mut job, input).await?;
        Ok(job)
    }

    /// Record an out-of-band completion from the remote processor.
    ///
    /// Applied only while the job is still processing the attempt the
    /// result belongs to. Anything else (the job was canceled, already
    /// finished, or retried since) is accepted and dropped.
    pub async fn record_completion(
        &self,
        id: &JobId,
        attempt: u32,
        generated: impl Into<String>,
    ) -> Result<WriteBack, SearchError> {
        let mut job = self.jobs.fetch(id).await?;
        if job.status != JobStatus::Processing || job.attempt != attempt {
            tracing::debug!(job = %id, status = %job.status, attempt, current = job.attempt, "stale completion write-back dropped");
            return Ok(WriteBack::Ignored);
        }
        self.complete(&mut job, generated.into()).await?;
        self.invalidate_user(&job.user_id).await;
        Ok(WriteBack::Applied)
    }

    /// Record an out-of-band failure from the remote processor.
    ///
    /// Same fencing as [`SearchStrings::record_completion`].
    pub async fn record_failure(
        &self,
        id: &JobId,
        attempt: u32,
        message: &str,
    ) -> Result<WriteBack, SearchError> {
        let mut job = self.jobs.fetch(id).await?;
        if job.status != JobStatus::Processing || job.attempt != attempt {
            tracing::debug!(job = %id, status = %job.status, attempt, current = job.attempt, "stale failure write-back dropped");
            return Ok(WriteBack::Ignored);
        }
        self.fail(&mut job, message).await?;
        self.invalidate_user(&job.user_id).await;
        Ok(WriteBack::Applied)
    }

    /// Move the job into processing and hand it to its processor.
    ///
    /// Text completes inline. Website and pdf return mid-flight after the
    /// start call; the remote processor owns the terminal write.
    async fn dispatch(
        &self,
        job: &mut SearchStringJob,
        input: JobInput,
    ) -> Result<(), SearchError> {
        self.transition(job, JobStatus::Processing, 0).await?;

        if input.is_empty() {
            let message = format!("{} job has no {} payload", job.kind, job.source);
            self.fail(job, &message).await?;
            return Err(SearchError::SourceMismatch(message));
        }

        match input {
            JobInput::Text(text) => {
                let payload = json!({
                    "job_id": job.id,
                    "kind": job.kind,
                    "text": text,
                });
                match self.store.invoke(&self.config.text_function, payload).await {
                    Ok(result) => {
                        let generated = result
                            .get("generated_string")
                            .and_then(serde_json::Value::as_str)
                            .map(str::to_string);
                        match generated {
                            Some(generated) => self.complete(job, generated).await,
                            None => {
                                let message =
                                    "text processor returned no search string".to_string();
                                self.fail(job, &message).await?;
                                Err(SearchError::Processing(message))
                            }
                        }
                    }
                    Err(err) => {
                        self.fail(job, &err.to_string()).await?;
                        Err(SearchError::Remote(err))
                    }
                }
            }
            JobInput::Website(url) => {
                let payload = json!({
                    "job_id": job.id,
                    "attempt": job.attempt,
                    "url": url,
                });
                match self
                    .store
                    .invoke(&self.config.crawler_function, payload)
                    .await
                {
                    Ok(_) => self.advance(job, 20).await,
                    Err(err) => {
                        self.fail(job, &err.to_string()).await?;
                        Err(SearchError::Remote(err))
                    }
                }
            }
            JobInput::Pdf { filename, bytes } => {
                let path = job
                    .input_pdf_path
                    .clone()
                    .unwrap_or_else(|| format!("{}/{}", job.id, filename));
                let stored = match self.store.upload(&self.config.bucket, &path, bytes).await {
                    Ok(stored) => stored,
                    Err(err) => {
                        self.fail(job, &err.to_string()).await?;
                        return Err(SearchError::Remote(err));
                    }
                };
                self.advance(job, 30).await?;

                let payload = json!({
                    "job_id": job.id,
                    "attempt": job.attempt,
                    "path": stored,
                });
                match self.store.invoke(&self.config.pdf_function, payload).await {
                    Ok(_) => self.advance(job, 50).await,
                    Err(err) => {
                        self.fail(job, &err.to_string()).await?;
                        Err(SearchError::Remote(err))
                    }
                }
            }
        }
    }

    /// Validated status write, keeping the in-memory job in step
    async fn transition(
        &self,
        job: &mut SearchStringJob,
        to: JobStatus,
        progress: u8,
    ) -> Result<(), SearchError> {
        validate_transition(job.status, to)?;
        let now = Utc::now();
        let patch = JobPatch::new().status(to).progress(progress).updated_at(now);
        self.jobs.patch(&job.id, &patch).await?;
        job.status = to;
        job.progress = progress;
        job.updated_at = now;
        Ok(())
    }

    /// Progress-only write within the current status
    async fn advance(&self, job: &mut SearchStringJob, progress: u8) -> Result<(), SearchError> {
        let now = Utc::now();
        let patch = JobPatch::new().progress(progress).updated_at(now);
        self.jobs.patch(&job.id, &patch).await?;
        job.progress = progress;
        job.updated_at = now;
        Ok(())
    }

    async fn complete(
        &self,
        job: &mut SearchStringJob,
        generated: String,
    ) -> Result<(), SearchError> {
        validate_transition(job.status, JobStatus::Completed)?;
        let now = Utc::now();
        let patch = JobPatch::new()
            .status(JobStatus::Completed)
            .progress(100)
            .generated_string(generated.clone())
            .is_processed(true)
            .processed_at(now)
            .clear_error()
            .updated_at(now);
        self.jobs.patch(&job.id, &patch).await?;
        job.status = JobStatus::Completed;
        job.progress = 100;
        job.generated_string = Some(generated);
        job.is_processed = true;
        job.processed_at = Some(now);
        job.error = None;
        job.updated_at = now;
        tracing::info!(job = %job.id, "search string generated");
        Ok(())
    }

    async fn fail(&self, job: &mut SearchStringJob, message: &str) -> Result<(), SearchError> {
        validate_transition(job.status, JobStatus::Failed)?;
        let now = Utc::now();
        // Progress is forced to 100 on failure too: it signals "no
        // further work pending", not success
        let patch = JobPatch::new()
            .status(JobStatus::Failed)
            .progress(100)
            .error(message)
            .updated_at(now);
        self.jobs.patch(&job.id, &patch).await?;
        job.status = JobStatus::Failed;
        job.progress = 100;
        job.error = Some(message.to_string());
        job.updated_at = now;
        tracing::warn!(job = %job.id, error = message, "search-string job failed");
        Ok(())
    }

    async fn invalidate_user(&self, user: &UserId) {
        self.cache.invalidate(&user_key(user)).await;
    }
}

fn user_key(user: &UserId) -> String {
    format!("search_jobs:{user}")
}
