//! Check-and-alert engine.
//!
//! This crate contains the decision logic of a check cycle and the
//! orchestrator that drives the feeds, classifier, notifier and stores.

pub mod alias;
pub mod error;
pub mod pipeline;
pub mod runner;
pub mod threshold;

pub use alias::*;
pub use error::*;
pub use pipeline::*;
pub use runner::*;
pub use threshold::*;
