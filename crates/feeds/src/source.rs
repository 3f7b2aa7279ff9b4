//! Capability traits for remote data sources.

use crate::FeedResult;
use async_trait::async_trait;
use cryptoshark_core::AssetId;
use std::collections::HashMap;

/// Batched price lookup from a market-data service.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the current USD price of every id in one call.
    /// Ids the service omits are priced at 0.0.
    async fn fetch_prices(&self, ids: &[AssetId]) -> FeedResult<HashMap<AssetId, f64>>;
}

/// Forum comment stream (latest comments of a community).
#[async_trait]
pub trait ForumSource: Send + Sync {
    async fn comments(&self, community: &str, limit: usize) -> FeedResult<Vec<String>>;
}

/// Recent post search on a microblog service.
#[async_trait]
pub trait PostSearchSource: Send + Sync {
    /// Search recent posts, returning only English-tagged texts.
    async fn recent_posts(&self, query: &str, max_results: u32) -> FeedResult<Vec<String>>;
}
