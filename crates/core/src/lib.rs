//! Core data types for the crypto sentiment watcher.

pub mod asset;
pub mod config;
pub mod market;
pub mod outcome;
pub mod state;

pub use asset::*;
pub use config::*;
pub use market::*;
pub use outcome::*;
pub use state::*;
