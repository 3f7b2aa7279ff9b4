//! Market-data and social text sources.
//!
//! This crate provides the network collaborators of a check cycle:
//!
//! - `coingecko` - batched price snapshots and the top-of-market listing
//! - `reddit` - forum comment stream
//! - `twitter` - recent post search
//! - `collector` - aggregation of the text sources, tolerant of per-source failure
//!
//! Every source sits behind a trait in `source` so callers can substitute fakes.

pub mod coingecko;
pub mod collector;
pub mod error;
pub mod http;
pub mod reddit;
pub mod source;
pub mod twitter;

pub use coingecko::*;
pub use collector::*;
pub use error::*;
pub use http::*;
pub use reddit::*;
pub use source::*;
pub use twitter::*;
