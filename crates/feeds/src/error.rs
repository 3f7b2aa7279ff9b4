//! Error types for feed operations.

use thiserror::Error;

/// Errors that can occur while fetching from a remote source.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Source not configured: {0}")]
    NotConfigured(String),
}

/// Result type for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout(err.to_string())
        } else if err.is_decode() {
            FeedError::ParseError(err.to_string())
        } else {
            FeedError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::ParseError(err.to_string())
    }
}

impl FeedError {
    /// Map a non-success HTTP status to the matching error.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        match status {
            429 => FeedError::RateLimitExceeded,
            401 | 403 => FeedError::AuthenticationFailed(format!("HTTP {}", status)),
            _ => FeedError::HttpStatus {
                status,
                body: body.into(),
            },
        }
    }

    /// Returns true if this error is transient and likely to succeed later.
    /// Nothing retries within a cycle; this only shapes log output.
    pub fn is_transient(&self) -> bool {
        match self {
            FeedError::ConnectionFailed(_)
            | FeedError::Timeout(_)
            | FeedError::RateLimitExceeded => true,
            FeedError::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if this error requires manual intervention.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            FeedError::AuthenticationFailed(_) | FeedError::NotConfigured(_)
        )
    }
}
