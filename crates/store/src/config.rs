//! Watch-list configuration file.

use crate::json::{load_json, save_json};
use crate::{StoreError, StoreResult};
use cryptoshark_core::{is_valid_asset_id, AssetId, ConfigValidationError, WatchConfig};
use std::path::{Path, PathBuf};
use tracing::info;

/// Reads and edits `config.json`. Every read goes to disk; nothing is cached.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load a fresh copy of the config. A missing file is the default config.
    /// Thresholds out of range and malformed ids are rejected.
    pub async fn load(&self) -> StoreResult<WatchConfig> {
        let config: WatchConfig = load_json(&self.path).await?.unwrap_or_default();
        config
            .validate()
            .map_err(|e| StoreError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    pub async fn save(&self, config: &WatchConfig) -> StoreResult<()> {
        save_json(&self.path, config).await
    }

    /// Track a new asset. Returns false if it was already tracked.
    pub async fn add_ticker(&self, id: AssetId) -> StoreResult<bool> {
        if !is_valid_asset_id(&id) {
            return Err(StoreError::InvalidConfig(
                ConfigValidationError::InvalidAssetId(id.to_string()).to_string(),
            ));
        }
        let mut config = self.load().await?;
        let label = id.clone();
        if !config.add_ticker(id) {
            return Ok(false);
        }
        self.save(&config).await?;
        info!(asset = %label, "Ticker added");
        Ok(true)
    }

    /// Stop tracking an asset. Returns false if it was not tracked.
    pub async fn remove_ticker(&self, id: &str) -> StoreResult<bool> {
        let mut config = self.load().await?;
        if !config.remove_ticker(id) {
            return Ok(false);
        }
        self.save(&config).await?;
        info!(asset = id, "Ticker removed");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptoshark_core::{asset_id, Thresholds};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        assert_eq!(store.load().await.unwrap(), WatchConfig::default());
    }

    #[tokio::test]
    async fn test_add_and_remove_persist() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));

        assert!(store.add_ticker(asset_id("bitcoin")).await.unwrap());
        assert!(store.add_ticker(asset_id("solana")).await.unwrap());
        assert!(!store.add_ticker(asset_id("bitcoin")).await.unwrap());
        assert!(store.remove_ticker("bitcoin").await.unwrap());
        assert!(!store.remove_ticker("dogecoin").await.unwrap());

        let config = store.load().await.unwrap();
        assert_eq!(config.tickers, vec![asset_id("solana")]);
        assert_eq!(config.thresholds, Thresholds::default());
    }

    #[tokio::test]
    async fn test_reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(
            &path,
            r#"{"tickers":["ethereum","bitcoin"],"thresholds":{"pct":2.5,"sentiment":0.5}}"#,
        )
        .await
        .unwrap();

        let config = ConfigStore::new(&path).load().await.unwrap();
        assert_eq!(config.tickers, vec![asset_id("ethereum"), asset_id("bitcoin")]);
        assert_eq!(config.thresholds, Thresholds::new(2.5, 0.5));
    }

    #[tokio::test]
    async fn test_invalid_thresholds_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{"thresholds":{"sentiment":2.0}}"#)
            .await
            .unwrap();

        assert!(matches!(
            ConfigStore::new(&path).load().await,
            Err(StoreError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_ids_with_spaces_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{"tickers":["bitcoin","bitcoin cash"]}"#)
            .await
            .unwrap();
        let store = ConfigStore::new(&path);

        assert!(matches!(store.load().await, Err(StoreError::InvalidConfig(_))));

        tokio::fs::remove_file(&path).await.unwrap();
        assert!(matches!(
            store.add_ticker(asset_id("bitcoin cash")).await,
            Err(StoreError::InvalidConfig(_))
        ));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        assert!(matches!(
            ConfigStore::new(&path).load().await,
            Err(StoreError::Json { .. })
        ));
    }
}
