//! Top-of-market snapshot entries.

use serde::{Deserialize, Serialize};

/// One entry of the market snapshot. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCoin {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    /// Thumbnail image URL.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub current_price: Option<f64>,
}

/// Market snapshot with lookup helpers.
#[derive(Debug, Clone, Default)]
pub struct MarketSnapshot {
    coins: Vec<MarketCoin>,
}

impl MarketSnapshot {
    pub fn new(coins: Vec<MarketCoin>) -> Self {
        Self { coins }
    }

    pub fn coins(&self) -> &[MarketCoin] {
        &self.coins
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&MarketCoin> {
        self.coins.iter().find(|c| c.id == id)
    }

    /// Image URL for an asset, if the snapshot has a non-empty one.
    pub fn image_for(&self, id: &str) -> Option<&str> {
        self.get(id)
            .and_then(|c| c.image.as_deref())
            .filter(|url| !url.is_empty())
    }

    /// Sum of all market caps in the snapshot.
    pub fn total_market_cap(&self) -> f64 {
        self.coins.iter().filter_map(|c| c.market_cap).sum()
    }

    /// Market cap of an asset as a percentage of the snapshot total.
    pub fn dominance(&self, id: &str) -> f64 {
        let total = self.total_market_cap();
        if total <= 0.0 {
            return 0.0;
        }
        let cap = self.get(id).and_then(|c| c.market_cap).unwrap_or(0.0);
        cap / total * 100.0
    }
}
