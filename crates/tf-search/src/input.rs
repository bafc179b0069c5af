//! Submission payloads

use tf_domain::InputSource;

use crate::error::SearchError;

/// One submission payload, matching its declared source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobInput {
    /// Pasted free text
    Text(String),
    /// URL handed to the remote crawler
    Website(String),
    /// PDF blob uploaded to the content store
    Pdf {
        /// Original file name, kept in the storage path
        filename: String,
        /// Raw file content
        bytes: Vec<u8>,
    },
}

impl JobInput {
    /// The source this payload belongs to
    #[inline]
    #[must_use]
    pub fn source(&self) -> InputSource {
        match self {
            Self::Text(_) => InputSource::Text,
            Self::Website(_) => InputSource::Website,
            Self::Pdf { .. } => InputSource::Pdf,
        }
    }

    /// Whether the payload carries nothing to process
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Website(url) => url.trim().is_empty(),
            Self::Pdf { filename, bytes } => filename.trim().is_empty() || bytes.is_empty(),
        }
    }

    /// Reject an empty payload before anything reaches the network
    pub(crate) fn validate(&self) -> Result<(), SearchError> {
        if self.is_empty() {
            Err(SearchError::Validation(format!(
                "empty {} payload",
                self.source()
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_payloads_are_empty() {
        assert!(JobInput::Text("   ".to_string()).is_empty());
        assert!(JobInput::Website(String::new()).is_empty());
        assert!(JobInput::Pdf {
            filename: "cv.pdf".to_string(),
            bytes: Vec::new(),
        }
        .is_empty());

        assert!(!JobInput::Text("Senior Java Developer".to_string()).is_empty());
    }

    #[test]
    fn payloads_know_their_source() {
        assert_eq!(
            JobInput::Website("https://example.com".to_string()).source(),
            InputSource::Website
        );
    }
}
