//! Shared HTTP client setup.

use crate::{FeedError, FeedResult};
use std::time::Duration;

/// Default per-request timeout. There is no cycle-level deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent sent to every service.
pub const DEFAULT_USER_AGENT: &str = concat!("cryptoshark/", env!("CARGO_PKG_VERSION"));

/// Build a client with a per-request timeout and user agent.
pub fn build_client(timeout: Duration, user_agent: &str) -> FeedResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| FeedError::ConnectionFailed(e.to_string()))
}

/// Turn a non-success response into a `FeedError`, keeping a short body excerpt.
pub async fn ensure_success(response: reqwest::Response) -> FeedResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let excerpt: String = body.chars().take(200).collect();
    Err(FeedError::from_status(status.as_u16(), excerpt))
}
