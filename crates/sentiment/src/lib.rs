//! Sentiment classification of short social texts.
//!
//! - `classifier` - lazily initialised, batching front end
//! - `model` - the `SentimentModel` seam and label types
//! - `huggingface` - hosted inference backend

pub mod classifier;
pub mod error;
pub mod huggingface;
pub mod model;

pub use classifier::*;
pub use error::*;
pub use huggingface::*;
pub use model::*;
