//! Alert notification seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cryptoshark_core::AssetId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Webhook returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Invalid webhook URL: {0}")]
    InvalidUrl(String),
}

/// Everything an alert reports about one asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEvent {
    pub asset_id: AssetId,
    pub price: f64,
    pub pct_change: Option<f64>,
    pub pct_positive: f64,
    pub pct_negative: f64,
    pub message_count: usize,
    /// Thumbnail image, if known.
    pub image_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Destination for alerts.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one alert. Exactly one outbound call, never retried.
    async fn send(&self, event: &AlertEvent) -> Result<(), AlertError>;
}
