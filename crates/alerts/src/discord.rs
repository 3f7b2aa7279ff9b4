//! Discord webhook delivery.

use crate::notifier::{AlertError, AlertEvent, NotificationSink};
use async_trait::async_trait;
use cryptoshark_core::{display_label, format_ratio, format_signed_pct};
use serde::Serialize;
use std::time::Duration;
use tracing::info;

/// Embed colour when there is no previous price.
pub const COLOR_NEUTRAL: u32 = 0x808080;
/// Embed colour for a rising (or flat) price.
pub const COLOR_UP: u32 = 0x2ecc71;
/// Embed colour for a falling price.
pub const COLOR_DOWN: u32 = 0xe74c3c;

/// Default display name of the posting bot.
pub const DEFAULT_USERNAME: &str = "CryptoSharkBot";

/// Webhook request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookPayload {
    pub username: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub footer: Footer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    fn inline(name: &str, value: String) -> Self {
        Self {
            name: name.to_string(),
            value,
            inline: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Footer {
    pub text: String,
}

/// Embed colour for a percent change.
pub fn color_for(pct_change: Option<f64>) -> u32 {
    match pct_change {
        None => COLOR_NEUTRAL,
        Some(pct) if pct >= 0.0 => COLOR_UP,
        Some(_) => COLOR_DOWN,
    }
}

/// Format an alert as a webhook payload.
pub fn build_payload(event: &AlertEvent, username: &str) -> WebhookPayload {
    let change = event
        .pct_change
        .map(format_signed_pct)
        .unwrap_or_else(|| "n/a".to_string());

    let embed = Embed {
        title: format!("🚨 ALERT {} 🚨", display_label(&event.asset_id)),
        thumbnail: event
            .image_url
            .as_ref()
            .filter(|url| !url.is_empty())
            .map(|url| Thumbnail { url: url.clone() }),
        color: color_for(event.pct_change),
        fields: vec![
            EmbedField::inline("Price", format!("${:.2}", event.price)),
            EmbedField::inline("Change", change),
            EmbedField::inline("% Positive", format_ratio(event.pct_positive)),
            EmbedField::inline("% Negative", format_ratio(event.pct_negative)),
            EmbedField::inline("Messages", event.message_count.to_string()),
        ],
        footer: Footer {
            text: event
                .timestamp
                .format("Timestamp: %Y-%m-%d %H:%M:%S")
                .to_string(),
        },
    };

    WebhookPayload {
        username: username.to_string(),
        embeds: vec![embed],
    }
}

/// Discord webhook sink.
pub struct DiscordWebhook {
    client: reqwest::Client,
    url: String,
    username: String,
}

impl DiscordWebhook {
    const TIMEOUT: Duration = Duration::from_secs(5);

    /// Create a webhook sink. The URL must be an absolute http(s) URL.
    pub fn new(url: impl Into<String>) -> Result<Self, AlertError> {
        let url = url.into();
        let parsed = reqwest::Url::parse(&url).map_err(|e| AlertError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AlertError::InvalidUrl(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }
        let client = reqwest::Client::builder().timeout(Self::TIMEOUT).build()?;
        Ok(Self {
            client,
            url,
            username: DEFAULT_USERNAME.to_string(),
        })
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }
}

#[async_trait]
impl NotificationSink for DiscordWebhook {
    async fn send(&self, event: &AlertEvent) -> Result<(), AlertError> {
        let payload = build_payload(event, &self.username);
        let response = self.client.post(&self.url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AlertError::Rejected {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        info!(asset = %event.asset_id, "Alert delivered");
        Ok(())
    }
}
