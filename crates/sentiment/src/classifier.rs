//! Lazily initialised, batching sentiment classifier.

use crate::{
    ClassificationResult, SentimentError, SentimentModel, SentimentResult, SentimentSummary,
};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Classifier limits.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Texts are cut to this many characters before submission.
    pub max_chars: usize,
    /// Number of texts per model request.
    pub batch_size: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_chars: 2000,
            batch_size: 16,
        }
    }
}

/// Cut `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Classifier front end. The model is warmed up once, on first use, and
/// reused for the lifetime of the classifier. A failed warm-up is retried
/// on the next call.
pub struct SentimentClassifier {
    model: Arc<dyn SentimentModel>,
    config: ClassifierConfig,
    ready: OnceCell<()>,
}

impl SentimentClassifier {
    pub fn new(model: Arc<dyn SentimentModel>, config: ClassifierConfig) -> Self {
        Self {
            model,
            config,
            ready: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn is_ready(&self) -> bool {
        self.ready.initialized()
    }

    /// Initialise the model if that has not happened yet.
    pub async fn ensure_ready(&self) -> SentimentResult<()> {
        self.ready
            .get_or_try_init(|| async {
                info!("Initializing sentiment model");
                self.model.warm_up().await.map_err(|e| match e {
                    SentimentError::Initialization(msg) => SentimentError::Initialization(msg),
                    other => SentimentError::Initialization(other.to_string()),
                })
            })
            .await?;
        Ok(())
    }

    /// Label every text, one result per input, in input order.
    pub async fn classify<S: AsRef<str>>(
        &self,
        texts: &[S],
    ) -> SentimentResult<Vec<ClassificationResult>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.ensure_ready().await?;

        let truncated: Vec<String> = texts
            .iter()
            .map(|t| truncate_chars(t.as_ref(), self.config.max_chars).to_string())
            .collect();

        let batch_size = self.config.batch_size.max(1);
        let mut results = Vec::with_capacity(truncated.len());

        for (chunk_idx, chunk) in truncated.chunks(batch_size).enumerate() {
            let labels = self.model.predict(chunk).await?;
            if labels.len() != chunk.len() {
                return Err(SentimentError::Malformed(format!(
                    "expected {} labels, got {}",
                    chunk.len(),
                    labels.len()
                )));
            }
            let offset = chunk_idx * batch_size;
            results.extend(
                labels
                    .into_iter()
                    .enumerate()
                    .map(|(i, label)| ClassificationResult {
                        index: offset + i,
                        label,
                    }),
            );
        }

        debug!(texts = results.len(), "Classified texts");
        Ok(results)
    }

    /// Classify and tally in one step.
    pub async fn summarize<S: AsRef<str>>(&self, texts: &[S]) -> SentimentResult<SentimentSummary> {
        let results = self.classify(texts).await?;
        Ok(SentimentSummary::from_results(&results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SentimentLabel;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Labels a text negative when it contains "dump", positive otherwise.
    #[derive(Default)]
    struct KeywordModel {
        warm_ups: AtomicUsize,
        failing_warm_ups: AtomicUsize,
        batches: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl SentimentModel for KeywordModel {
        async fn warm_up(&self) -> SentimentResult<()> {
            self.warm_ups.fetch_add(1, Ordering::SeqCst);
            if self.failing_warm_ups.load(Ordering::SeqCst) > 0 {
                self.failing_warm_ups.fetch_sub(1, Ordering::SeqCst);
                return Err(SentimentError::Request("model loading".into()));
            }
            Ok(())
        }

        async fn predict(&self, batch: &[String]) -> SentimentResult<Vec<SentimentLabel>> {
            self.batches.lock().unwrap().push(batch.to_vec());
            Ok(batch
                .iter()
                .map(|t| {
                    if t.contains("dump") {
                        SentimentLabel::Negative
                    } else {
                        SentimentLabel::Positive
                    }
                })
                .collect())
        }
    }

    struct ShortModel;

    #[async_trait]
    impl SentimentModel for ShortModel {
        async fn warm_up(&self) -> SentimentResult<()> {
            Ok(())
        }

        async fn predict(&self, _batch: &[String]) -> SentimentResult<Vec<SentimentLabel>> {
            Ok(vec![SentimentLabel::Positive])
        }
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("ééé", 2), "éé");
        assert_eq!(truncate_chars("", 2), "");
    }

    #[tokio::test]
    async fn test_classify_preserves_order_across_batches() {
        let model = Arc::new(KeywordModel::default());
        let classifier = SentimentClassifier::new(model.clone(), ClassifierConfig::default());

        let texts: Vec<String> = (0..40)
            .map(|i| if i % 4 == 0 { format!("dump {}", i) } else { format!("moon {}", i) })
            .collect();
        let results = classifier.classify(&texts).await.unwrap();

        assert_eq!(results.len(), 40);
        for (i, r) in results.iter().enumerate() {
            assert_eq!(r.index, i);
            let expected = if i % 4 == 0 {
                SentimentLabel::Negative
            } else {
                SentimentLabel::Positive
            };
            assert_eq!(r.label, expected);
        }

        let sizes: Vec<usize> = model.batches.lock().unwrap().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![16, 16, 8]);
    }

    #[tokio::test]
    async fn test_texts_are_truncated() {
        let model = Arc::new(KeywordModel::default());
        let classifier = SentimentClassifier::new(model.clone(), ClassifierConfig::default());

        let long = "a".repeat(5000);
        classifier.classify(&[long]).await.unwrap();

        let batches = model.batches.lock().unwrap();
        assert_eq!(batches[0][0].chars().count(), 2000);
    }

    #[tokio::test]
    async fn test_model_initialised_once() {
        let model = Arc::new(KeywordModel::default());
        let classifier = SentimentClassifier::new(model.clone(), ClassifierConfig::default());
        assert!(!classifier.is_ready());

        classifier.classify(&["btc"]).await.unwrap();
        classifier.classify(&["eth"]).await.unwrap();

        assert!(classifier.is_ready());
        assert_eq!(model.warm_ups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_initialisation_is_retried() {
        let model = Arc::new(KeywordModel {
            failing_warm_ups: AtomicUsize::new(1),
            ..Default::default()
        });
        let classifier = SentimentClassifier::new(model.clone(), ClassifierConfig::default());

        let err = classifier.ensure_ready().await.unwrap_err();
        assert!(matches!(err, SentimentError::Initialization(_)));
        assert!(!classifier.is_ready());

        classifier.ensure_ready().await.unwrap();
        assert_eq!(model.warm_ups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_input_skips_model() {
        let model = Arc::new(KeywordModel::default());
        let classifier = SentimentClassifier::new(model.clone(), ClassifierConfig::default());
        let empty: [&str; 0] = [];

        assert!(classifier.classify(&empty).await.unwrap().is_empty());
        assert_eq!(model.warm_ups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_label_count_mismatch_is_malformed() {
        let classifier =
            SentimentClassifier::new(Arc::new(ShortModel), ClassifierConfig::default());
        let err = classifier.classify(&["a", "b"]).await.unwrap_err();
        assert!(matches!(err, SentimentError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_summarize() {
        let classifier = SentimentClassifier::new(
            Arc::new(KeywordModel::default()),
            ClassifierConfig::default(),
        );
        let summary = classifier
            .summarize(&["btc dump", "btc dump again", "btc moon"])
            .await
            .unwrap();
        assert_eq!(summary.negative, 2);
        assert_eq!(summary.positive, 1);
    }
}
