//! CryptoShark - watch-list price and sentiment alerts.
//!
//! Runs check cycles against a data directory and manages the watch list.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::AppConfig;
use cryptoshark_store::DataPaths;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// CryptoShark CLI
#[derive(Parser, Debug)]
#[command(name = "cryptoshark")]
#[command(about = "Crypto watch-list price and sentiment alerts", long_about = None)]
struct Args {
    /// Directory holding config.json, state.json, coins_cache.json and logs.txt
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one check cycle and print the summary
    Check,
    /// Run check cycles on a timer until Ctrl+C
    Watch {
        /// Seconds between the end of one cycle and the start of the next
        #[arg(long, default_value_t = 900)]
        interval_secs: u64,
    },
    /// Track an asset (CoinGecko id, e.g. "bitcoin")
    Add { id: String },
    /// Stop tracking an asset
    Remove { id: String },
    /// Show tracked assets with market data
    List,
    /// Show the alert history
    Logs {
        /// Only the last N entries
        #[arg(long)]
        tail: Option<usize>,
    },
    /// Refetch the top-100 market snapshot
    RefreshMarkets,
}

fn init_logging(level: &str) {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    init_logging(&args.log_level);

    let paths = DataPaths::in_dir(&args.data_dir);
    let coingecko_key = std::env::var(config::COINGECKO_API_KEY)
        .ok()
        .filter(|k| !k.is_empty());

    match args.command {
        Command::Check => {
            let runner = commands::build_runner(&AppConfig::from_env()?, &paths)?;
            commands::check(&runner).await
        }
        Command::Watch { interval_secs } => {
            info!("🦈 CryptoShark starting...");
            info!("  Data dir: {}", args.data_dir.display());
            let runner = commands::build_runner(&AppConfig::from_env()?, &paths)?;
            commands::watch(&runner, Duration::from_secs(interval_secs)).await
        }
        Command::Add { id } => commands::add(&paths, &id).await,
        Command::Remove { id } => commands::remove(&paths, &id).await,
        Command::List => commands::list(&paths, coingecko_key).await,
        Command::Logs { tail } => commands::logs(&paths, tail).await,
        Command::RefreshMarkets => commands::refresh_markets(&paths, coingecko_key).await,
    }
}
