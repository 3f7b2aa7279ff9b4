//! Error types for sentiment classification.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("Model initialization failed: {0}")]
    Initialization(String),

    #[error("Inference request failed: {0}")]
    Request(String),

    #[error("Inference endpoint returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Malformed inference response: {0}")]
    Malformed(String),
}

pub type SentimentResult<T> = Result<T, SentimentError>;

impl From<reqwest::Error> for SentimentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SentimentError::Malformed(err.to_string())
        } else {
            SentimentError::Request(err.to_string())
        }
    }
}
