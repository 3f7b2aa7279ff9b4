//! Alert delivery for coincident price and sentiment moves.
//!
//! This crate provides:
//! - The `NotificationSink` seam used by the check pipeline
//! - Discord webhook delivery with embed formatting

pub mod discord;
pub mod notifier;

pub use discord::{build_payload, DiscordWebhook, Embed, EmbedField, WebhookPayload};
pub use notifier::{AlertError, AlertEvent, NotificationSink};
