//! Watch-list configuration.

use crate::{is_valid_asset_id, AssetId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default minimum absolute price change in percent.
pub const DEFAULT_PCT_THRESHOLD: f64 = 3.0;
/// Default minimum negative-sentiment ratio.
pub const DEFAULT_SENTIMENT_THRESHOLD: f64 = 0.6;

/// Errors raised by configuration validation.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("pct threshold must be a finite value >= 0, got {0}")]
    InvalidPct(f64),

    #[error("sentiment threshold must be within [0, 1], got {0}")]
    InvalidSentiment(f64),

    #[error("asset id {0:?} must be lowercase letters, digits or '-'")]
    InvalidAssetId(String),
}

/// Alert thresholds. Both must be met to fire an alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum absolute price change in percent.
    #[serde(default = "default_pct")]
    pub pct: f64,
    /// Minimum ratio of negative messages (0.0 - 1.0).
    #[serde(default = "default_sentiment")]
    pub sentiment: f64,
}

fn default_pct() -> f64 {
    DEFAULT_PCT_THRESHOLD
}

fn default_sentiment() -> f64 {
    DEFAULT_SENTIMENT_THRESHOLD
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            pct: DEFAULT_PCT_THRESHOLD,
            sentiment: DEFAULT_SENTIMENT_THRESHOLD,
        }
    }
}

impl Thresholds {
    pub fn new(pct: f64, sentiment: f64) -> Self {
        Self { pct, sentiment }
    }

    /// Check that both thresholds are within their valid ranges.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.pct.is_finite() || self.pct < 0.0 {
            return Err(ConfigValidationError::InvalidPct(self.pct));
        }
        if !(0.0..=1.0).contains(&self.sentiment) {
            return Err(ConfigValidationError::InvalidSentiment(self.sentiment));
        }
        Ok(())
    }
}

/// Watch-list configuration as persisted in `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Tracked asset ids, in check order.
    #[serde(default)]
    pub tickers: Vec<AssetId>,
    #[serde(default)]
    pub thresholds: Thresholds,
}

impl WatchConfig {
    pub fn new(tickers: Vec<AssetId>, thresholds: Thresholds) -> Self {
        Self { tickers, thresholds }
    }

    /// Check thresholds and every tracked id.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.thresholds.validate()?;
        if let Some(bad) = self.tickers.iter().find(|t| !is_valid_asset_id(t)) {
            return Err(ConfigValidationError::InvalidAssetId(bad.to_string()));
        }
        Ok(())
    }

    /// Check whether an asset is tracked.
    pub fn is_tracked(&self, id: &str) -> bool {
        self.tickers.iter().any(|t| t == id)
    }

    /// Append a ticker if not already tracked. Returns true if added.
    pub fn add_ticker(&mut self, id: AssetId) -> bool {
        if self.is_tracked(&id) {
            return false;
        }
        self.tickers.push(id);
        true
    }

    /// Remove a ticker. Returns true if it was tracked.
    pub fn remove_ticker(&mut self, id: &str) -> bool {
        let before = self.tickers.len();
        self.tickers.retain(|t| t != id);
        self.tickers.len() != before
    }

    /// Tickers with duplicates dropped, first occurrence wins.
    pub fn unique_tickers(&self) -> Vec<AssetId> {
        let mut seen: Vec<AssetId> = Vec::with_capacity(self.tickers.len());
        for t in &self.tickers {
            if !seen.contains(t) {
                seen.push(t.clone());
            }
        }
        seen
    }
}
