//! Error types for the engine.

use cryptoshark_store::StoreError;
use thiserror::Error;

/// Failures outside a cycle's own outcome. Anything that only affects a
/// cycle is reported through `CycleReport::Aborted` instead.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type EngineResult<T> = Result<T, EngineError>;
