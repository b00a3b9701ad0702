use thiserror::Error;

/// Failure taxonomy for the data source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Credential missing, expired or rejected. Never retried.
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn is_auth(&self) -> bool {
        matches!(self, FetchError::Auth(_))
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Network(_))
    }
}
