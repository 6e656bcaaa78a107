//! Service configuration from the environment

use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SINK_URL: &str = "http://localhost:5000/messages";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("STUDYCHAT_SINK_URL is not a valid http(s) URL: {0}")]
    InvalidSinkUrl(String),
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Configuration for the chat service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Collection endpoint every message is POSTed to
    pub sink_url: String,
    pub port: u16,
    /// Client timeout for sink posts; none by default
    pub sink_timeout: Option<Duration>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            sink_url: DEFAULT_SINK_URL.to_string(),
            port: DEFAULT_PORT,
            sink_timeout: None,
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup (tests pass a map)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let sink_url = lookup("STUDYCHAT_SINK_URL").unwrap_or_else(|| DEFAULT_SINK_URL.to_string());
        match Url::parse(&sink_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => return Err(ConfigError::InvalidSinkUrl(sink_url)),
        }

        let port = match lookup("STUDYCHAT_PORT") {
            Some(value) => value
                .parse::<u16>()
                .ok()
                .filter(|p| *p > 0)
                .ok_or(ConfigError::InvalidNumber {
                    name: "STUDYCHAT_PORT",
                    value,
                })?,
            None => DEFAULT_PORT,
        };

        let sink_timeout = match lookup("STUDYCHAT_SINK_TIMEOUT_SECS") {
            Some(value) => Some(
                value
                    .parse::<u64>()
                    .ok()
                    .filter(|s| *s > 0)
                    .map(Duration::from_secs)
                    .ok_or(ConfigError::InvalidNumber {
                        name: "STUDYCHAT_SINK_TIMEOUT_SECS",
                        value,
                    })?,
            ),
            None => None,
        };

        Ok(Self {
            sink_url,
            port,
            sink_timeout,
        })
    }
}
