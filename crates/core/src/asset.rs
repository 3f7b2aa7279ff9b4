//! Asset identifiers.

use compact_str::CompactString;

/// Canonical asset id as used by the market-data service (e.g., "bitcoin").
pub type AssetId = CompactString;

/// Create an asset id from any string-like value.
#[inline]
pub fn asset_id(id: impl AsRef<str>) -> AssetId {
    CompactString::new(id.as_ref())
}

/// Check that an id uses only the market-data id alphabet: lowercase ASCII
/// letters, digits and `-`. Audit lines split on whitespace, so ids with
/// spaces would not read back.
pub fn is_valid_asset_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Upper-cased label used in summaries and alert titles (e.g., "BITCOIN").
pub fn display_label(id: &str) -> String {
    id.to_uppercase()
}

/// Hashtag for an asset id, keeping only ASCII alphanumerics.
/// Returns None if nothing usable remains.
pub fn hashtag(id: &str) -> Option<String> {
    let tag: String = id.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    if tag.is_empty() {
        None
    } else {
        Some(format!("#{}", tag))
    }
}
