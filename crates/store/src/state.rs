//! Last observed prices, persisted between cycles.

use crate::json::{load_json, save_json};
use crate::StoreResult;
use cryptoshark_core::PriceState;
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON file holding the full `PriceState`.
///
/// Loaded at the start of a cycle and overwritten once at its end. Not safe
/// for overlapping cycles: the last writer wins.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted state. A missing file is an empty state.
    pub async fn load(&self) -> StoreResult<PriceState> {
        Ok(load_json(&self.path).await?.unwrap_or_default())
    }

    /// Replace the persisted state.
    pub async fn save(&self, state: &PriceState) -> StoreResult<()> {
        save_json(&self.path, state).await?;
        debug!(assets = state.len(), path = %self.path.display(), "State saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptoshark_core::asset_id;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));

        let mut state = PriceState::new();
        state.record(asset_id("bitcoin"), 104.0);
        state.record(asset_id("ethereum"), 3000.5);
        store.save(&state).await.unwrap();

        assert_eq!(store.load().await.unwrap(), state);
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));

        let mut first = PriceState::new();
        first.record(asset_id("bitcoin"), 1.0);
        first.record(asset_id("solana"), 2.0);
        store.save(&first).await.unwrap();

        let mut second = PriceState::new();
        second.record(asset_id("bitcoin"), 3.0);
        store.save(&second).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.last_price("bitcoin"), Some(3.0));
        assert_eq!(loaded.last_price("solana"), None);
    }

    #[tokio::test]
    async fn test_reads_hand_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, r#"{"ripple": {"last_price": 0.52}}"#)
            .await
            .unwrap();

        let state = StateStore::new(&path).load().await.unwrap();
        assert_eq!(state.last_price("ripple"), Some(0.52));
    }
}
