//! Hosted inference backend for a binary sentiment model.

use crate::{SentimentError, SentimentLabel, SentimentModel, SentimentResult};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";

/// Hosted inference settings.
#[derive(Clone)]
pub struct HuggingFaceConfig {
    /// Full model endpoint URL.
    pub endpoint: String,
    /// Optional bearer token.
    pub api_token: Option<String>,
    /// Token limit applied by the model's tokenizer.
    pub max_tokens: usize,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HuggingFaceConfig {
    const BASE_URL: &'static str = "https://router.huggingface.co/hf-inference/models";

    /// Endpoint for a model hosted on the default inference router.
    pub fn for_model(model: &str) -> Self {
        Self {
            endpoint: format!("{}/{}", Self::BASE_URL, model),
            ..Default::default()
        }
    }
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            endpoint: format!("{}/{}", Self::BASE_URL, DEFAULT_MODEL),
            api_token: None,
            max_tokens: 512,
            timeout: Duration::from_secs(10),
        }
    }
}

impl std::fmt::Debug for HuggingFaceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceConfig")
            .field("endpoint", &self.endpoint)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Sentiment model served by a hosted text-classification endpoint.
pub struct HuggingFaceModel {
    client: reqwest::Client,
    config: HuggingFaceConfig,
}

impl HuggingFaceModel {
    const WARM_UP_TEXT: &'static str = "warm up";

    pub fn new(config: HuggingFaceConfig) -> SentimentResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| SentimentError::Initialization(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Request body for one batch.
    fn request_body(&self, inputs: &[String]) -> serde_json::Value {
        json!({
            "inputs": inputs,
            "parameters": {
                "truncation": true,
                "max_length": self.config.max_tokens,
            },
            "options": { "wait_for_model": true },
        })
    }

    async fn infer(&self, inputs: &[String]) -> SentimentResult<serde_json::Value> {
        let mut request = self
            .client
            .post(&self.config.endpoint)
            .json(&self.request_body(inputs));
        if let Some(ref token) = self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SentimentError::HttpStatus {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl SentimentModel for HuggingFaceModel {
    async fn warm_up(&self) -> SentimentResult<()> {
        let probe = vec![Self::WARM_UP_TEXT.to_string()];
        let body = self
            .infer(&probe)
            .await
            .map_err(|e| SentimentError::Initialization(e.to_string()))?;
        parse_labels(&body, 1).map_err(|e| SentimentError::Initialization(e.to_string()))?;
        debug!(endpoint = %self.config.endpoint, "Sentiment model ready");
        Ok(())
    }

    async fn predict(&self, batch: &[String]) -> SentimentResult<Vec<SentimentLabel>> {
        let body = self.infer(batch).await?;
        parse_labels(&body, batch.len())
    }
}

/// Parse a text-classification response into one label per input.
///
/// Accepts both shapes the endpoint produces: a list of candidate lists
/// (`[[{"label":..,"score":..}, ..], ..]`, highest score wins) and a flat
/// list with one top candidate per input.
pub fn parse_labels(
    body: &serde_json::Value,
    expected: usize,
) -> SentimentResult<Vec<SentimentLabel>> {
    if let Some(err) = body["error"].as_str() {
        return Err(SentimentError::Request(err.to_string()));
    }
    let items = body
        .as_array()
        .ok_or_else(|| SentimentError::Malformed("response is not an array".to_string()))?;

    let labels = items
        .iter()
        .map(|item| match item {
            serde_json::Value::Array(candidates) => top_label(candidates),
            serde_json::Value::Object(_) => label_of(item),
            _ => Err(SentimentError::Malformed(format!("unexpected item: {}", item))),
        })
        .collect::<SentimentResult<Vec<_>>>()?;

    if labels.len() != expected {
        return Err(SentimentError::Malformed(format!(
            "expected {} labels, got {}",
            expected,
            labels.len()
        )));
    }
    Ok(labels)
}

fn top_label(candidates: &[serde_json::Value]) -> SentimentResult<SentimentLabel> {
    let best = candidates
        .iter()
        .max_by(|a, b| {
            let sa = a["score"].as_f64().unwrap_or(f64::MIN);
            let sb = b["score"].as_f64().unwrap_or(f64::MIN);
            sa.total_cmp(&sb)
        })
        .ok_or_else(|| SentimentError::Malformed("empty candidate list".to_string()))?;
    label_of(best)
}

fn label_of(candidate: &serde_json::Value) -> SentimentResult<SentimentLabel> {
    let raw = candidate["label"]
        .as_str()
        .ok_or_else(|| SentimentError::Malformed("candidate has no label".to_string()))?;
    SentimentLabel::from_model_label(raw)
        .ok_or_else(|| SentimentError::Malformed(format!("unknown label: {}", raw)))
}
