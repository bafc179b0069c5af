//! Error surface of the remote adapter

/// Failures reported by the remote data service or its transport
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Network or client failure before the service answered
    #[error("transport failure: {0}")]
    Transport(String),

    /// The service answered with an error
    #[error("service error: {0}")]
    Service(String),

    /// Row-level policy recursion; the privileged listing function is the
    /// supported alternate read path
    #[error("policy recursion: {0}")]
    PolicyRecursion(String),

    /// A row addressed by id does not exist
    #[error("{table} row not found: {id}")]
    NotFound {
        /// Collection queried
        table: String,
        /// Missing id
        id: String,
    },

    /// A row did not decode into its typed record
    #[error("malformed row: {0}")]
    Decode(#[from] serde_json::Error),

    /// Blob upload failed
    #[error("upload failed: {0}")]
    Upload(String),
}

impl RemoteError {
    /// Classify a raw service message.
    ///
    /// The data service reports row-policy recursion as a plain error
    /// string; it has to be sniffed out of the message text.
    #[must_use]
    pub fn from_service_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains("infinite recursion") {
            Self::PolicyRecursion(message)
        } else {
            Self::Service(message)
        }
    }

    /// Whether the alternate read path applies
    #[inline]
    #[must_use]
    pub fn is_policy_recursion(&self) -> bool {
        matches!(self, Self::PolicyRecursion(_))
    }
}
