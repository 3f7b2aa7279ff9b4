//! Per-asset alias table used to attribute social texts to assets.

use cryptoshark_core::AssetId;
use std::collections::HashMap;

/// Built-in aliases for the commonly watched assets.
const DEFAULT_ALIASES: &[(&str, &[&str])] = &[
    ("bitcoin", &["bitcoin", "btc"]),
    ("ethereum", &["ethereum", "eth"]),
    ("ripple", &["ripple", "xrp"]),
    ("solana", &["solana", "sol"]),
    ("chainlink", &["chainlink", "link"]),
];

/// Canonical asset id -> ordered, lowercase alias tokens.
///
/// The canonical id is always one of its own aliases. Ids with no entry
/// match on the id alone.
#[derive(Debug, Clone)]
pub struct AliasIndex {
    table: HashMap<AssetId, Vec<String>>,
}

impl Default for AliasIndex {
    fn default() -> Self {
        let mut index = Self::empty();
        for (id, aliases) in DEFAULT_ALIASES {
            index = index.with_aliases(id, aliases.iter().copied());
        }
        index
    }
}

impl AliasIndex {
    /// Index with no entries; every id matches only itself.
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Add or replace the aliases of an asset.
    pub fn with_aliases<'a>(
        mut self,
        id: &str,
        aliases: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut tokens = vec![id.to_lowercase()];
        for alias in aliases {
            let alias = alias.trim().to_lowercase();
            if !alias.is_empty() && !tokens.contains(&alias) {
                tokens.push(alias);
            }
        }
        self.table.insert(AssetId::from(id), tokens);
        self
    }

    /// Alias tokens for an asset, lowercase, canonical id first.
    pub fn aliases(&self, id: &str) -> Vec<String> {
        self.table
            .get(id)
            .cloned()
            .unwrap_or_else(|| vec![id.to_lowercase()])
    }

    /// Texts mentioning the asset: case-insensitive substring match on any
    /// alias, not word-boundary matched. Input order is preserved.
    pub fn filter<'t, S: AsRef<str>>(&self, texts: &'t [S], id: &str) -> Vec<&'t str> {
        let aliases = self.aliases(id);
        texts
            .iter()
            .map(AsRef::as_ref)
            .filter(|text| {
                let lower = text.to_lowercase();
                aliases.iter().any(|alias| lower.contains(alias.as_str()))
            })
            .collect()
    }
}
