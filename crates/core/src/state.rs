//! Persisted per-asset price state.

use crate::AssetId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Last observed state of a single asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetState {
    /// Last observed price, absent if never recorded.
    #[serde(default)]
    pub last_price: Option<f64>,
}

/// Mapping of asset id to its last observed state.
///
/// Passed into a check cycle and returned from it; persistence happens
/// at the cycle boundary only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceState {
    assets: BTreeMap<AssetId, AssetState>,
}

impl PriceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last recorded price for an asset.
    pub fn last_price(&self, id: &str) -> Option<f64> {
        self.assets.get(id).and_then(|s| s.last_price)
    }

    /// Record the latest observed price, overwriting any previous value.
    pub fn record(&mut self, id: AssetId, price: f64) {
        self.assets.insert(
            id,
            AssetState {
                last_price: Some(price),
            },
        );
    }

    pub fn get(&self, id: &str) -> Option<&AssetState> {
        self.assets.get(id)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AssetId, &AssetState)> {
        self.assets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset_id;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_overwrites() {
        let mut state = PriceState::new();
        assert_eq!(state.last_price("bitcoin"), None);

        state.record(asset_id("bitcoin"), 100.0);
        state.record(asset_id("bitcoin"), 104.0);
        assert_eq!(state.last_price("bitcoin"), Some(104.0));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_json_shape() {
        let mut state = PriceState::new();
        state.record(asset_id("bitcoin"), 104.5);
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"bitcoin":{"last_price":104.5}}"#);

        let parsed: PriceState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_entry_without_price() {
        let parsed: PriceState = serde_json::from_str(r#"{"solana":{}}"#).unwrap();
        assert!(parsed.get("solana").is_some());
        assert_eq!(parsed.last_price("solana"), None);
    }
}
