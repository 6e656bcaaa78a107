//! Sink error types

use thiserror::Error;

/// The sink could not be reached. This is the only way a post can fail:
/// response statuses are never inspected.
#[derive(Debug, Error)]
#[error("message sink unreachable ({endpoint}): {message}")]
pub struct SinkError {
    pub endpoint: String,
    pub message: String,
}

impl SinkError {
    pub fn unreachable(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub(super) fn from_reqwest(endpoint: &str, error: &reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            format!("Request timeout: {error}")
        } else if error.is_connect() {
            format!("Connection failed: {error}")
        } else {
            format!("Request failed: {error}")
        };
        Self::unreachable(endpoint, message)
    }
}
