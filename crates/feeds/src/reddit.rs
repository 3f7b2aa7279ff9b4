//! Reddit comment stream via application-only OAuth.

use crate::http::{build_client, ensure_success, DEFAULT_TIMEOUT};
use crate::{FeedError, FeedResult, ForumSource};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Maximum page size accepted by the listing endpoint.
const PAGE_SIZE: usize = 100;

/// Application credentials for Reddit.
#[derive(Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl std::fmt::Debug for RedditCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Read-only Reddit client.
pub struct RedditClient {
    client: reqwest::Client,
    credentials: RedditCredentials,
}

impl RedditClient {
    const TOKEN_URL: &'static str = "https://www.reddit.com/api/v1/access_token";
    const API_URL: &'static str = "https://oauth.reddit.com";

    pub fn new(credentials: RedditCredentials) -> FeedResult<Self> {
        Self::with_timeout(credentials, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(credentials: RedditCredentials, timeout: Duration) -> FeedResult<Self> {
        let client = build_client(timeout, &credentials.user_agent)?;
        Ok(Self {
            client,
            credentials,
        })
    }

    /// Obtain an application-only access token.
    async fn access_token(&self) -> FeedResult<String> {
        let response = self
            .client
            .post(Self::TOKEN_URL)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        let json: serde_json::Value = ensure_success(response).await?.json().await?;

        json["access_token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                let reason = json["error"].as_str().unwrap_or("no access_token in response");
                FeedError::AuthenticationFailed(reason.to_string())
            })
    }
}

#[async_trait]
impl ForumSource for RedditClient {
    async fn comments(&self, community: &str, limit: usize) -> FeedResult<Vec<String>> {
        let token = self.access_token().await?;
        let url = format!("{}/r/{}/comments", Self::API_URL, community);

        let mut bodies = Vec::with_capacity(limit);
        let mut after: Option<String> = None;

        while bodies.len() < limit {
            let page_size = (limit - bodies.len()).min(PAGE_SIZE).to_string();
            let mut request = self
                .client
                .get(&url)
                .bearer_auth(&token)
                .query(&[("limit", page_size.as_str()), ("raw_json", "1")]);
            if let Some(ref cursor) = after {
                request = request.query(&[("after", cursor.as_str())]);
            }

            let json: serde_json::Value =
                ensure_success(request.send().await?).await?.json().await?;
            let page = parse_listing(&json)?;
            let received = page.bodies.len();
            bodies.extend(page.bodies);

            match page.after {
                Some(cursor) if received > 0 => after = Some(cursor),
                _ => break,
            }
        }

        bodies.truncate(limit);
        debug!("Reddit: Fetched {} comments from r/{}", bodies.len(), community);
        Ok(bodies)
    }
}

/// One page of a comment listing.
#[derive(Debug, Default, PartialEq)]
pub struct ListingPage {
    pub bodies: Vec<String>,
    pub after: Option<String>,
}

/// Parse a listing: `{"kind":"Listing","data":{"after":..,"children":[{"kind":"t1","data":{"body":..}}]}}`.
pub fn parse_listing(json: &serde_json::Value) -> FeedResult<ListingPage> {
    let data = &json["data"];
    let children = data["children"]
        .as_array()
        .ok_or_else(|| FeedError::ParseError("listing has no children array".to_string()))?;

    let bodies = children
        .iter()
        .filter_map(|child| child["data"]["body"].as_str())
        .map(str::to_string)
        .collect();
    let after = data["after"].as_str().map(str::to_string);

    Ok(ListingPage { bodies, after })
}
