//! Cached top-of-market snapshot (`coins_cache.json`).

use crate::json::{load_json, save_json};
use crate::{StoreError, StoreResult};
use cryptoshark_core::{MarketCoin, MarketSnapshot};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::debug;

/// Age after which the snapshot should be refetched.
pub const CACHE_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
pub struct MarketCache {
    path: PathBuf,
}

impl MarketCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached snapshot. A missing file is an empty snapshot.
    pub async fn load(&self) -> StoreResult<MarketSnapshot> {
        let coins: Vec<MarketCoin> = load_json(&self.path).await?.unwrap_or_default();
        Ok(MarketSnapshot::new(coins))
    }

    /// Whether the file exists and was written less than `ttl` ago.
    pub async fn is_fresh(&self, ttl: Duration) -> StoreResult<bool> {
        let modified = match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta.modified().map_err(|e| StoreError::io(&self.path, e))?,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        // A modification time in the future counts as fresh.
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        Ok(age < ttl)
    }

    /// Replace the cache with a freshly fetched markets array.
    pub async fn save(&self, markets: &serde_json::Value) -> StoreResult<()> {
        save_json(&self.path, markets).await?;
        debug!(
            entries = markets.as_array().map(Vec::len).unwrap_or(0),
            "Market cache written"
        );
        Ok(())
    }
}
