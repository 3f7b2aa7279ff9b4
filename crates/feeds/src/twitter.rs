//! Twitter (X) v2 recent search.

use crate::http::{build_client, ensure_success, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::{FeedError, FeedResult, PostSearchSource};
use async_trait::async_trait;
use cryptoshark_core::{hashtag, AssetId};
use std::time::Duration;
use tracing::debug;

/// Bounds the search endpoint accepts for `max_results`.
pub const MIN_SEARCH_RESULTS: u32 = 10;
pub const MAX_SEARCH_RESULTS: u32 = 100;

/// Language kept from search results.
const LANG_EN: &str = "en";

/// Recent search client authenticated with an app bearer token.
pub struct TwitterClient {
    client: reqwest::Client,
    bearer_token: String,
    base_url: String,
}

impl TwitterClient {
    const BASE_URL: &'static str = "https://api.twitter.com/2";

    pub fn new(bearer_token: impl Into<String>) -> FeedResult<Self> {
        Self::with_timeout(bearer_token, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(bearer_token: impl Into<String>, timeout: Duration) -> FeedResult<Self> {
        let bearer_token = bearer_token.into();
        if bearer_token.is_empty() {
            return Err(FeedError::NotConfigured("bearer token is empty".to_string()));
        }
        Ok(Self {
            client: build_client(timeout, DEFAULT_USER_AGENT)?,
            bearer_token,
            base_url: Self::BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl PostSearchSource for TwitterClient {
    async fn recent_posts(&self, query: &str, max_results: u32) -> FeedResult<Vec<String>> {
        let max_results = max_results
            .clamp(MIN_SEARCH_RESULTS, MAX_SEARCH_RESULTS)
            .to_string();
        let response = self
            .client
            .get(format!("{}/tweets/search/recent", self.base_url))
            .bearer_auth(&self.bearer_token)
            .query(&[
                ("query", query),
                ("tweet.fields", "lang"),
                ("max_results", max_results.as_str()),
            ])
            .send()
            .await?;
        let json: serde_json::Value = ensure_success(response).await?.json().await?;

        let texts = parse_search_response(&json)?;
        debug!("Twitter: Fetched {} English posts", texts.len());
        Ok(texts)
    }
}

/// Build the search query for a watch list:
/// `(#bitcoin OR #ethereum) -is:retweet lang:en`.
/// Returns None when no asset yields a usable hashtag.
pub fn build_search_query(ids: &[AssetId]) -> Option<String> {
    let tags: Vec<String> = ids.iter().filter_map(|id| hashtag(id)).collect();
    if tags.is_empty() {
        return None;
    }
    Some(format!("({}) -is:retweet lang:{}", tags.join(" OR "), LANG_EN))
}

/// Parse a search body: `{"data":[{"id":..,"text":..,"lang":"en"}],"meta":{..}}`.
/// A body without `data` means no matches. Non-English posts are dropped.
pub fn parse_search_response(json: &serde_json::Value) -> FeedResult<Vec<String>> {
    if !json.is_object() {
        return Err(FeedError::ParseError(
            "search response is not an object".to_string(),
        ));
    }
    let Some(posts) = json["data"].as_array() else {
        return Ok(Vec::new());
    };

    Ok(posts
        .iter()
        .filter(|post| post["lang"].as_str() == Some(LANG_EN))
        .filter_map(|post| post["text"].as_str())
        .map(str::to_string)
        .collect())
}
