//! File-backed cycle runner: load config, state and cache, run, persist.

use crate::pipeline::{enter, CycleStage};
use crate::{CheckOrchestrator, EngineResult};
use cryptoshark_core::CycleReport;
use cryptoshark_store::{AuditLogger, ConfigStore, DataPaths, MarketCache, StateStore};
use tracing::{info, warn};

pub struct CheckRunner {
    orchestrator: CheckOrchestrator,
    config: ConfigStore,
    state: StateStore,
    cache: MarketCache,
    audit: AuditLogger,
}

impl CheckRunner {
    pub fn new(orchestrator: CheckOrchestrator, paths: &DataPaths) -> Self {
        Self {
            orchestrator,
            config: ConfigStore::new(&paths.config),
            state: StateStore::new(&paths.state),
            cache: MarketCache::new(&paths.market_cache),
            audit: AuditLogger::new(&paths.audit_log),
        }
    }

    pub fn orchestrator(&self) -> &CheckOrchestrator {
        &self.orchestrator
    }

    /// Run one cycle against the data files.
    ///
    /// Config and cache are read fresh every time. State is written once,
    /// after a completed cycle; an aborted cycle leaves it untouched.
    pub async fn run_once(&self) -> EngineResult<CycleReport> {
        let config = match self.config.load().await {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Config unusable, cycle aborted");
                return Ok(CycleReport::aborted(format!("Error loading config: {}", e)));
            }
        };
        let state = self.state.load().await?;
        let snapshot = self.cache.load().await.unwrap_or_else(|e| {
            warn!(error = %e, "Market cache unreadable, alerts go without thumbnails");
            Default::default()
        });

        let (report, state) = self
            .orchestrator
            .run_cycle(&config, state, &snapshot, &self.audit)
            .await;
        if report.is_aborted() {
            return Ok(report);
        }

        enter(CycleStage::Persisting);
        self.state.save(&state).await?;
        enter(CycleStage::Done);

        info!(
            assets = report.outcomes().len(),
            alerts = report.alerts_sent(),
            "Check cycle complete"
        );
        Ok(report)
    }
}
