//! CoinGecko REST API fetchers.
//!
//! Fetches batched spot prices for the watch list and the top-100 market
//! listing used for display images.

use crate::http::{build_client, ensure_success, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::{FeedError, FeedResult, PriceSource};
use async_trait::async_trait;
use cryptoshark_core::AssetId;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Size of the top-of-market listing.
pub const TOP_MARKETS_PER_PAGE: u32 = 100;

/// CoinGecko REST client.
pub struct CoinGeckoClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    const BASE_URL: &'static str = "https://api.coingecko.com/api/v3";
    const API_KEY_HEADER: &'static str = "x-cg-demo-api-key";

    /// Create a client with the default timeout.
    pub fn new(api_key: Option<String>) -> FeedResult<Self> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(api_key: Option<String>, timeout: Duration) -> FeedResult<Self> {
        Ok(Self {
            client: build_client(timeout, DEFAULT_USER_AGENT)?,
            base_url: Self::BASE_URL.to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    /// Override the API base URL (e.g., the pro endpoint).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(format!("{}{}", self.base_url, path));
        match self.api_key {
            Some(ref key) => request.header(Self::API_KEY_HEADER, key),
            None => request,
        }
    }

    /// Fetch the top-100 coins by market cap.
    /// Returns the raw JSON array so it can be cached as received.
    pub async fn fetch_top_markets(&self) -> FeedResult<serde_json::Value> {
        let per_page = TOP_MARKETS_PER_PAGE.to_string();
        let response = self
            .get("/coins/markets")
            .query(&[
                ("vs_currency", "usd"),
                ("order", "market_cap_desc"),
                ("per_page", per_page.as_str()),
                ("page", "1"),
                ("sparkline", "false"),
            ])
            .send()
            .await?;
        let json: serde_json::Value = ensure_success(response).await?.json().await?;

        if !json.is_array() {
            return Err(FeedError::ParseError(
                "markets response is not an array".to_string(),
            ));
        }
        debug!(
            "CoinGecko: Fetched {} market entries",
            json.as_array().map(Vec::len).unwrap_or(0)
        );
        Ok(json)
    }
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn fetch_prices(&self, ids: &[AssetId]) -> FeedResult<HashMap<AssetId, f64>> {
        if ids.is_empty() {
            debug!("CoinGecko: No ids to fetch");
            return Ok(HashMap::new());
        }
        let joined = ids
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(",");
        debug!("CoinGecko: Fetching prices for {}", joined);

        let response = self
            .get("/simple/price")
            .query(&[("ids", joined.as_str()), ("vs_currencies", "usd")])
            .send()
            .await?;
        let json: serde_json::Value = ensure_success(response).await?.json().await?;

        parse_simple_price(&json, ids)
    }
}

/// Parse a `/simple/price` body: `{"bitcoin":{"usd":104.0}, ...}`.
/// Ids missing from the body are priced at 0.0.
pub fn parse_simple_price(
    json: &serde_json::Value,
    ids: &[AssetId],
) -> FeedResult<HashMap<AssetId, f64>> {
    let object = json
        .as_object()
        .ok_or_else(|| FeedError::ParseError("price response is not an object".to_string()))?;

    let prices = ids
        .iter()
        .map(|id| {
            let price = object
                .get(id.as_str())
                .and_then(|entry| entry["usd"].as_f64())
                .unwrap_or(0.0);
            (id.clone(), price)
        })
        .collect();
    Ok(prices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptoshark_core::asset_id;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_price() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"bitcoin":{"usd":104.25},"ethereum":{"usd":3000}}"#)
                .unwrap();
        let ids = vec![asset_id("bitcoin"), asset_id("ethereum")];
        let prices = parse_simple_price(&json, &ids).unwrap();
        assert_eq!(prices.get("bitcoin"), Some(&104.25));
        assert_eq!(prices.get("ethereum"), Some(&3000.0));
    }

    #[test]
    fn test_parse_simple_price_missing_id_is_zero() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"bitcoin":{"usd":104.25},"ripple":{}}"#).unwrap();
        let ids = vec![asset_id("bitcoin"), asset_id("ripple"), asset_id("unknown-coin")];
        let prices = parse_simple_price(&json, &ids).unwrap();
        assert_eq!(prices.len(), 3);
        assert_eq!(prices.get("ripple"), Some(&0.0));
        assert_eq!(prices.get("unknown-coin"), Some(&0.0));
    }

    #[test]
    fn test_parse_simple_price_rejects_non_object() {
        let json: serde_json::Value = serde_json::from_str(r#"[1, 2, 3]"#).unwrap();
        let ids = vec![asset_id("bitcoin")];
        assert!(matches!(
            parse_simple_price(&json, &ids),
            Err(FeedError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_ids_skip_request() {
        // Unroutable base URL: any request would fail.
        let client = CoinGeckoClient::new(None)
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let prices = client.fetch_prices(&[]).await.unwrap();
        assert!(prices.is_empty());
    }
}
