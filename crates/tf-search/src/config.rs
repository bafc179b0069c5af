//! Orchestrator configuration

/// Names of the remote endpoints the orchestrator talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Storage bucket for uploaded PDFs
    pub bucket: String,
    /// Function generating a search string from raw text
    pub text_function: String,
    /// Function crawling a website; completes the job out-of-band
    pub crawler_function: String,
    /// Function reading an uploaded PDF; completes the job out-of-band
    pub pdf_function: String,
}

impl SearchConfig {
    /// Create the default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the storage bucket
    #[must_use]
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            bucket: "search-strings".to_string(),
            text_function: "generate-search-string".to_string(),
            crawler_function: "process-search-website".to_string(),
            pdf_function: "process-search-pdf".to_string(),
        }
    }
}
