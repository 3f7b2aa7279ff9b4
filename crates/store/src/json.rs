//! JSON file helpers shared by the stores.

use crate::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::Path;

/// Read a JSON file. A missing or empty file yields `None`.
pub(crate) async fn load_json<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| StoreError::json(path, e))
}

/// Write a value as indented JSON, replacing the file contents.
///
/// The data goes to a sibling temp file first and is renamed into place.
pub(crate) async fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> StoreResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| StoreError::json(path, e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::io(parent, e))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    tokio::fs::write(&tmp, text)
        .await
        .map_err(|e| StoreError::io(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::io(path, e))
}
