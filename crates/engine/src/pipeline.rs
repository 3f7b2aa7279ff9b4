//! One check cycle: collect texts, fetch prices, evaluate each asset.
//!
//! Stages run strictly in sequence:
//!
//! ```text
//! Idle -> FetchingText -> FetchingPrices -> {Aborted | EvaluatingAssets} -> Persisting -> Done
//! ```
//!
//! The cycle takes the last known prices by value and hands back the
//! updated copy; persisting it is the caller's job.

use crate::{percent_change, should_alert, AliasIndex};
use chrono::Utc;
use cryptoshark_alerts::{AlertEvent, NotificationSink};
use cryptoshark_core::{
    AssetId, CheckOutcome, CycleReport, MarketSnapshot, PriceState, Thresholds, WatchConfig,
};
use cryptoshark_feeds::{PriceSource, SocialTextCollector};
use cryptoshark_sentiment::SentimentClassifier;
use cryptoshark_store::{AuditLogger, AuditRecord};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Cycle state machine stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStage {
    Idle,
    FetchingText,
    FetchingPrices,
    EvaluatingAssets,
    Persisting,
    Done,
    Aborted,
}

impl fmt::Display for CycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CycleStage::Idle => "idle",
            CycleStage::FetchingText => "fetching_text",
            CycleStage::FetchingPrices => "fetching_prices",
            CycleStage::EvaluatingAssets => "evaluating_assets",
            CycleStage::Persisting => "persisting",
            CycleStage::Done => "done",
            CycleStage::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

pub(crate) fn enter(stage: CycleStage) {
    debug!(%stage, "Cycle stage");
}

/// Drives the collaborators of a check cycle.
///
/// Holds the classifier for the process lifetime so the model is only
/// initialised once. Cycles must not overlap.
pub struct CheckOrchestrator {
    prices: Arc<dyn PriceSource>,
    collector: SocialTextCollector,
    classifier: SentimentClassifier,
    notifier: Arc<dyn NotificationSink>,
    aliases: AliasIndex,
}

impl CheckOrchestrator {
    pub fn new(
        prices: Arc<dyn PriceSource>,
        collector: SocialTextCollector,
        classifier: SentimentClassifier,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            prices,
            collector,
            classifier,
            notifier,
            aliases: AliasIndex::default(),
        }
    }

    pub fn with_aliases(mut self, aliases: AliasIndex) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn classifier(&self) -> &SentimentClassifier {
        &self.classifier
    }

    /// Run one cycle over the watch list.
    ///
    /// On abort the returned state is the input state, untouched, and no
    /// audit lines have been written.
    pub async fn run_cycle(
        &self,
        config: &WatchConfig,
        mut state: PriceState,
        snapshot: &MarketSnapshot,
        audit: &AuditLogger,
    ) -> (CycleReport, PriceState) {
        enter(CycleStage::Idle);
        let tickers = config.unique_tickers();
        if tickers.is_empty() {
            debug!("Watch list is empty");
            return (CycleReport::Completed { outcomes: Vec::new() }, state);
        }

        enter(CycleStage::FetchingText);
        let texts = self.collector.collect(&tickers).await;

        enter(CycleStage::FetchingPrices);
        let prices = match self.prices.fetch_prices(&tickers).await {
            Ok(prices) => prices,
            Err(e) => {
                enter(CycleStage::Aborted);
                warn!(error = %e, "Price fetch failed, cycle aborted");
                return (CycleReport::aborted(format!("Error fetching prices: {}", e)), state);
            }
        };

        let matched: Vec<Vec<&str>> = tickers
            .iter()
            .map(|id| self.aliases.filter(&texts, id))
            .collect();

        // The model is only needed when some asset has texts to classify.
        if matched.iter().any(|m| !m.is_empty()) {
            if let Err(e) = self.classifier.ensure_ready().await {
                enter(CycleStage::Aborted);
                warn!(error = %e, "Sentiment model unavailable, cycle aborted");
                return (
                    CycleReport::aborted(format!("Error initializing sentiment model: {}", e)),
                    state,
                );
            }
        }

        enter(CycleStage::EvaluatingAssets);
        let mut outcomes = Vec::with_capacity(tickers.len());
        for (id, matched) in tickers.iter().zip(&matched) {
            let outcome = self
                .evaluate_asset(id, &prices, matched, &state, &config.thresholds, snapshot)
                .await;
            state.record(id.clone(), outcome.price);

            let record = AuditRecord::from_outcome(&outcome, Utc::now());
            if let Err(e) = audit.append(&record).await {
                warn!(asset = %id, error = %e, "Failed to append audit line");
            }
            outcomes.push(outcome);
        }

        info!(
            assets = outcomes.len(),
            texts = texts.len(),
            alerts = outcomes.iter().filter(|o| o.alert_fired).count(),
            "Assets evaluated"
        );
        (CycleReport::Completed { outcomes }, state)
    }

    async fn evaluate_asset(
        &self,
        id: &AssetId,
        prices: &HashMap<AssetId, f64>,
        matched: &[&str],
        state: &PriceState,
        thresholds: &Thresholds,
        snapshot: &MarketSnapshot,
    ) -> CheckOutcome {
        let price = prices.get(id).copied().unwrap_or(0.0);
        let pct_change = percent_change(price, state.last_price(id));

        let mut outcome = CheckOutcome {
            asset_id: id.clone(),
            price,
            pct_change,
            pct_positive: 0.0,
            pct_negative: 0.0,
            message_count: matched.len(),
            alert_fired: false,
            sentiment_error: None,
            alert_error: None,
        };

        match self.classifier.summarize(matched).await {
            Ok(summary) => {
                outcome.pct_positive = summary.pct_positive();
                outcome.pct_negative = summary.pct_negative();
            }
            Err(e) => {
                warn!(asset = %id, error = %e, "Classification failed");
                outcome.sentiment_error = Some(e.to_string());
                return outcome;
            }
        }

        if !should_alert(pct_change, outcome.pct_negative, thresholds) {
            return outcome;
        }

        let event = AlertEvent {
            asset_id: id.clone(),
            price,
            pct_change,
            pct_positive: outcome.pct_positive,
            pct_negative: outcome.pct_negative,
            message_count: outcome.message_count,
            image_url: snapshot.image_for(id).map(str::to_string),
            timestamp: Utc::now(),
        };
        match self.notifier.send(&event).await {
            Ok(()) => outcome.alert_fired = true,
            Err(e) => {
                warn!(asset = %id, error = %e, "Alert delivery failed");
                outcome.alert_error = Some(e.to_string());
            }
        }
        outcome
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use async_trait::async_trait;
    use cryptoshark_alerts::{AlertError, AlertEvent, NotificationSink};
    use cryptoshark_core::AssetId;
    use cryptoshark_feeds::{FeedError, FeedResult, PostSearchSource, PriceSource};
    use cryptoshark_sentiment::{SentimentError, SentimentLabel, SentimentModel, SentimentResult};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    pub struct FakePrices {
        pub prices: HashMap<String, f64>,
        pub fail: bool,
        pub calls: AtomicUsize,
    }

    impl FakePrices {
        pub fn new(prices: &[(&str, f64)]) -> Self {
            Self {
                prices: prices.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(&[])
            }
        }
    }

    #[async_trait]
    impl PriceSource for FakePrices {
        async fn fetch_prices(&self, ids: &[AssetId]) -> FeedResult<HashMap<AssetId, f64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FeedError::Timeout("no response".to_string()));
            }
            Ok(ids
                .iter()
                .map(|id| (id.clone(), self.prices.get(id.as_str()).copied().unwrap_or(0.0)))
                .collect())
        }
    }

    pub struct FakePosts(pub Vec<String>);

    #[async_trait]
    impl PostSearchSource for FakePosts {
        async fn recent_posts(&self, _query: &str, _max_results: u32) -> FeedResult<Vec<String>> {
            Ok(self.0.clone())
        }
    }

    /// Labels a text negative when it contains "dump", positive otherwise.
    #[derive(Default)]
    pub struct KeywordModel {
        pub warm_ups: AtomicUsize,
        pub fail_warm_up: bool,
        pub fail_predict_on: Option<String>,
    }

    #[async_trait]
    impl SentimentModel for KeywordModel {
        async fn warm_up(&self) -> SentimentResult<()> {
            self.warm_ups.fetch_add(1, Ordering::SeqCst);
            if self.fail_warm_up {
                return Err(SentimentError::Initialization("model offline".to_string()));
            }
            Ok(())
        }

        async fn predict(&self, batch: &[String]) -> SentimentResult<Vec<SentimentLabel>> {
            if let Some(ref needle) = self.fail_predict_on {
                if batch.iter().any(|t| t.contains(needle.as_str())) {
                    return Err(SentimentError::Malformed("bad batch".to_string()));
                }
            }
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

    #[derive(Default)]
    pub struct RecordingSink {
        pub sent: Mutex<Vec<AlertEvent>>,
        pub reject: bool,
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn send(&self, event: &AlertEvent) -> Result<(), AlertError> {
            if self.reject {
                return Err(AlertError::Rejected {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            self.sent.lock().unwrap().push(event.clone());
            Ok(())
        }
    }
}
