//! Model seam and label types.

use crate::SentimentResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Binary sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl SentimentLabel {
    /// Parse a model label, case-insensitively ("POSITIVE", "negative", ...).
    pub fn from_model_label(label: &str) -> Option<Self> {
        if label.eq_ignore_ascii_case("positive") {
            Some(SentimentLabel::Positive)
        } else if label.eq_ignore_ascii_case("negative") {
            Some(SentimentLabel::Negative)
        } else {
            None
        }
    }
}

/// Label for one input text. `index` refers to the position in the
/// sequence passed to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationResult {
    pub index: usize,
    pub label: SentimentLabel,
}

/// Positive/negative tally over a set of classification results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentSummary {
    pub positive: usize,
    pub negative: usize,
    pub total: usize,
}

impl SentimentSummary {
    pub fn from_results(results: &[ClassificationResult]) -> Self {
        let positive = results
            .iter()
            .filter(|r| r.label == SentimentLabel::Positive)
            .count();
        let negative = results
            .iter()
            .filter(|r| r.label == SentimentLabel::Negative)
            .count();
        Self {
            positive,
            negative,
            total: results.len(),
        }
    }

    /// Share of positive results, 0.0 for an empty set.
    pub fn pct_positive(&self) -> f64 {
        ratio(self.positive, self.total)
    }

    /// Share of negative results, 0.0 for an empty set.
    pub fn pct_negative(&self) -> f64 {
        ratio(self.negative, self.total)
    }
}

fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// A text classification model.
///
/// `warm_up` performs any expensive one-time setup; `predict` labels one
/// batch and must return exactly one label per input, in order.
#[async_trait]
pub trait SentimentModel: Send + Sync {
    async fn warm_up(&self) -> SentimentResult<()>;

    async fn predict(&self, batch: &[String]) -> SentimentResult<Vec<SentimentLabel>>;
}
