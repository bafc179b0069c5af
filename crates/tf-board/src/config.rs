//! Board configuration

use chrono::Duration;

/// Tunables for the pipeline board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    /// Window inside which an item carries the "recently updated" badge
    pub recency_window: Duration,
}

impl BoardConfig {
    /// Create the default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the recency window
    #[inline]
    #[must_use]
    pub fn with_recency_window(mut self, window: Duration) -> Self {
        self.recency_window = window;
        self
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            recency_window: Duration::hours(24),
        }
    }
}
