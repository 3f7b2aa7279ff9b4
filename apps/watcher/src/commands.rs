//! Subcommand implementations.

use crate::config::AppConfig;
use cryptoshark_alerts::DiscordWebhook;
use cryptoshark_core::{asset_id, display_label, is_valid_asset_id, MarketSnapshot};
use cryptoshark_engine::{CheckOrchestrator, CheckRunner};
use cryptoshark_feeds::{
    CoinGeckoClient, CollectorConfig, RedditClient, SocialTextCollector, TwitterClient,
};
use cryptoshark_sentiment::{
    ClassifierConfig, HuggingFaceConfig, HuggingFaceModel, SentimentClassifier,
};
use cryptoshark_store::{AuditLogger, ConfigStore, DataPaths, MarketCache, CACHE_TTL};
use std::error::Error;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

pub type CommandResult = Result<(), Box<dyn Error>>;

/// Wire the production collaborators into a runner.
pub fn build_runner(config: &AppConfig, paths: &DataPaths) -> Result<CheckRunner, Box<dyn Error>> {
    let prices = Arc::new(CoinGeckoClient::new(config.coingecko_key.clone())?);

    let mut collector = SocialTextCollector::new(CollectorConfig::default())
        .with_post_search(Arc::new(TwitterClient::new(config.twitter_token.clone())?));
    match config.reddit {
        Some(ref credentials) => {
            collector = collector.with_forum(Arc::new(RedditClient::new(credentials.clone())?));
        }
        None => warn!("Reddit credentials not set, forum comments disabled"),
    }

    let mut hf = match config.hf_model {
        Some(ref model) => HuggingFaceConfig::for_model(model),
        None => HuggingFaceConfig::default(),
    };
    if let Some(ref endpoint) = config.hf_endpoint {
        hf.endpoint = endpoint.clone();
    }
    hf.api_token = config.hf_token.clone();
    let classifier = SentimentClassifier::new(
        Arc::new(HuggingFaceModel::new(hf)?),
        ClassifierConfig::default(),
    );

    let notifier = Arc::new(DiscordWebhook::new(config.webhook_url.clone())?);

    let orchestrator = CheckOrchestrator::new(prices, collector, classifier, notifier);
    Ok(CheckRunner::new(orchestrator, paths))
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

/// Run one cycle and print its summary.
pub async fn check(runner: &CheckRunner) -> CommandResult {
    let report = runner.run_once().await?;
    print_lines(&report.summary_lines());
    Ok(())
}

/// Run cycles back to back until Ctrl-C.
///
/// A signal that arrives mid-cycle lets that cycle finish, then stops.
pub async fn watch(runner: &CheckRunner, interval: Duration) -> CommandResult {
    info!(interval_secs = interval.as_secs(), "Watching, press Ctrl+C to stop");
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C"),
        }
    });

    run_until_shutdown(
        move || async move {
            match runner.run_once().await {
                Ok(report) => print_lines(&report.summary_lines()),
                Err(e) => warn!(error = %e, "Check cycle failed"),
            }
        },
        interval,
        shutdown_rx,
    )
    .await;
    Ok(())
}

/// Run `cycle`, then sleep `interval`, until `shutdown` turns true.
/// Shutdown is checked after every cycle and during every sleep.
async fn run_until_shutdown<F, Fut>(
    mut cycle: F,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    loop {
        cycle().await;
        if *shutdown.borrow_and_update() {
            return;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            Ok(()) = shutdown.changed() => {
                if *shutdown.borrow() {
                    return;
                }
            }
        }
    }
}

pub async fn add(paths: &DataPaths, id: &str) -> CommandResult {
    let id = id.trim().to_lowercase();
    if !is_valid_asset_id(&id) {
        return Err(format!(
            "invalid asset id {:?}: use the CoinGecko id, e.g. \"bitcoin-cash\"",
            id
        )
        .into());
    }
    let store = ConfigStore::new(&paths.config);
    if store.add_ticker(asset_id(&id)).await? {
        println!("Added {}", id);
    } else {
        println!("{} is already tracked", id);
    }
    Ok(())
}

pub async fn remove(paths: &DataPaths, id: &str) -> CommandResult {
    let id = id.trim().to_lowercase();
    let store = ConfigStore::new(&paths.config);
    if store.remove_ticker(&id).await? {
        println!("Removed {}", id);
    } else {
        println!("{} is not tracked", id);
    }
    Ok(())
}

/// Fetch the top-of-market listing and overwrite the cache.
pub async fn refresh_markets(paths: &DataPaths, api_key: Option<String>) -> CommandResult {
    let markets = CoinGeckoClient::new(api_key)?.fetch_top_markets().await?;
    MarketCache::new(&paths.market_cache).save(&markets).await?;
    info!(
        coins = markets.as_array().map(Vec::len).unwrap_or(0),
        "Market snapshot refreshed"
    );
    Ok(())
}

/// Snapshot for display, refetched when older than the cache TTL.
async fn current_snapshot(paths: &DataPaths, api_key: Option<String>) -> MarketSnapshot {
    let cache = MarketCache::new(&paths.market_cache);
    if !cache.is_fresh(CACHE_TTL).await.unwrap_or(false) {
        if let Err(e) = refresh_markets(paths, api_key).await {
            warn!(error = %e, "Market refresh failed, using cached snapshot");
        }
    }
    cache.load().await.unwrap_or_else(|e| {
        warn!(error = %e, "Market cache unreadable");
        MarketSnapshot::default()
    })
}

pub async fn list(paths: &DataPaths, api_key: Option<String>) -> CommandResult {
    let config = ConfigStore::new(&paths.config).load().await?;
    if config.tickers.is_empty() {
        println!("No assets tracked");
        return Ok(());
    }

    let snapshot = current_snapshot(paths, api_key).await;
    println!(
        "Thresholds: price move {:.2}%, negative share {:.0}%",
        config.thresholds.pct,
        config.thresholds.sentiment * 100.0
    );
    for id in config.unique_tickers() {
        let label = display_label(&id);
        match snapshot.get(&id) {
            Some(coin) => println!(
                "{:<12} ${:>14.2}  cap ${:>18.0}  dominance {:>6.2}%",
                label,
                coin.current_price.unwrap_or(0.0),
                coin.market_cap.unwrap_or(0.0),
                snapshot.dominance(&id)
            ),
            None => println!("{:<12} (not in top-{} snapshot)", label, snapshot.coins().len()),
        }
    }
    Ok(())
}

pub async fn logs(paths: &DataPaths, tail: Option<usize>) -> CommandResult {
    let log = AuditLogger::new(&paths.audit_log).read_all().await?;
    if log.malformed > 0 {
        warn!(lines = log.malformed, "Skipped malformed audit lines");
    }

    let skip = tail
        .map(|n| log.records.len().saturating_sub(n))
        .unwrap_or(0);
    println!(
        "{:<27}  {:<10}  {:>12}  {:>9}  {:>5}  {:>5}  {:<5}",
        "Time", "Asset", "Price", "Change", "Pos", "Neg", "Alert"
    );
    for r in &log.records[skip..] {
        println!(
            "{:<27}  {:<10}  {:>12.2}  {:>+8.2}%  {:>4.0}%  {:>4.0}%  {:<5}",
            r.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            r.asset_id,
            r.price,
            r.pct_change,
            r.pct_positive * 100.0,
            r.pct_negative * 100.0,
            r.alert_label()
        );
    }
    Ok(())
}
