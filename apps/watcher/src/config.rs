//! Runtime settings from the environment.

use cryptoshark_feeds::RedditCredentials;
use thiserror::Error;

pub const DISCORD_WEBHOOK_URL: &str = "DISCORD_WEBHOOK_URL";
pub const TWITTER_BEARER_TOKEN: &str = "TWITTER_BEARER_TOKEN";
pub const REDDIT_CLIENT_ID: &str = "REDDIT_CLIENT_ID";
pub const REDDIT_CLIENT_SECRET: &str = "REDDIT_CLIENT_SECRET";
pub const REDDIT_USER_AGENT: &str = "REDDIT_USER_AGENT";
pub const HF_API_TOKEN: &str = "HF_API_TOKEN";
pub const HF_INFERENCE_URL: &str = "HF_INFERENCE_URL";
pub const HF_MODEL: &str = "HF_MODEL";
pub const COINGECKO_API_KEY: &str = "COINGECKO_API_KEY";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
}

/// Secrets and endpoints needed to run a check cycle.
#[derive(Clone)]
pub struct AppConfig {
    pub webhook_url: String,
    pub twitter_token: String,
    /// Forum source is disabled when absent.
    pub reddit: Option<RedditCredentials>,
    pub hf_token: Option<String>,
    pub hf_endpoint: Option<String>,
    /// Model id on the hosted router; ignored when `hf_endpoint` is set.
    pub hf_model: Option<String>,
    pub coingecko_key: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("webhook_url", &"<redacted>")
            .field("twitter_token", &"<redacted>")
            .field("reddit", &self.reddit)
            .field("hf_token", &self.hf_token.as_ref().map(|_| "<redacted>"))
            .field("hf_endpoint", &self.hf_endpoint)
            .field("hf_model", &self.hf_model)
            .field("coingecko_key", &self.coingecko_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AppConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let reddit = match (
            get(REDDIT_CLIENT_ID),
            get(REDDIT_CLIENT_SECRET),
            get(REDDIT_USER_AGENT),
        ) {
            (Some(client_id), Some(client_secret), Some(user_agent)) => Some(RedditCredentials {
                client_id,
                client_secret,
                user_agent,
            }),
            _ => None,
        };

        Ok(Self {
            webhook_url: required(DISCORD_WEBHOOK_URL)?,
            twitter_token: required(TWITTER_BEARER_TOKEN)?,
            reddit,
            hf_token: get(HF_API_TOKEN),
            hf_endpoint: get(HF_INFERENCE_URL),
            hf_model: get(HF_MODEL),
            coingecko_key: get(COINGECKO_API_KEY),
        })
    }
}
