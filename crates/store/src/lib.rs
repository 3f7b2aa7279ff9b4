//! File-backed persistence for the watcher.
//!
//! - `config` - watch-list configuration (`config.json`)
//! - `state` - last observed prices (`state.json`), full overwrite per cycle
//! - `audit` - append-only history log (`logs.txt`)
//! - `market_cache` - top-of-market snapshot (`coins_cache.json`)

pub mod audit;
pub mod config;
pub mod error;
pub mod market_cache;
pub mod paths;
pub mod state;

mod json;

pub use audit::{AuditLog, AuditLogger, AuditRecord};
pub use config::ConfigStore;
pub use error::{StoreError, StoreResult};
pub use market_cache::{MarketCache, CACHE_TTL};
pub use paths::DataPaths;
pub use state::StateStore;
