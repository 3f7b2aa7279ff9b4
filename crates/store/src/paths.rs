//! Locations of the watcher's data files.

use std::path::{Path, PathBuf};

/// Data files under one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub config: PathBuf,
    pub state: PathBuf,
    pub market_cache: PathBuf,
    pub audit_log: PathBuf,
}

impl DataPaths {
    pub const CONFIG_FILE: &'static str = "config.json";
    pub const STATE_FILE: &'static str = "state.json";
    pub const MARKET_CACHE_FILE: &'static str = "coins_cache.json";
    pub const AUDIT_LOG_FILE: &'static str = "logs.txt";

    /// Standard file names under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            config: dir.join(Self::CONFIG_FILE),
            state: dir.join(Self::STATE_FILE),
            market_cache: dir.join(Self::MARKET_CACHE_FILE),
            audit_log: dir.join(Self::AUDIT_LOG_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir() {
        let paths = DataPaths::in_dir("/data");
        assert_eq!(paths.config, PathBuf::from("/data/config.json"));
        assert_eq!(paths.audit_log, PathBuf::from("/data/logs.txt"));
    }
}
