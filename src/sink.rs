//! Message sink client
//!
//! Every chat message is appended to an external store with a plain HTTP
//! POST. Delivery is best effort: the response is neither read nor checked.

mod error;

pub use error::SinkError;

use crate::state_machine::Message;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Append-only destination for chat messages
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Store one message. Not idempotent: posting twice stores twice.
    async fn post(&self, message: &Message) -> Result<(), SinkError>;

    /// Where messages go, for logging
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: MessageSink + ?Sized> MessageSink for Arc<T> {
    async fn post(&self, message: &Message) -> Result<(), SinkError> {
        (**self).post(message).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

// ============================================================================
// HTTP sink
// ============================================================================

/// Posts messages as JSON to a REST collection endpoint
pub struct HttpSink {
    client: Client,
    endpoint: String,
}

impl HttpSink {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> reqwest::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl MessageSink for HttpSink {
    async fn post(&self, message: &Message) -> Result<(), SinkError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(message)
            .send()
            .await
            .map_err(|e| SinkError::from_reqwest(&self.endpoint, &e))?;

        // Any status counts as stored
        tracing::debug!(status = %response.status(), "Sink responded");
        Ok(())
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

// ============================================================================
// Logging wrapper
// ============================================================================

/// Logging wrapper for sinks
pub struct LoggingSink {
    inner: Arc<dyn MessageSink>,
}

impl LoggingSink {
    pub fn new(inner: Arc<dyn MessageSink>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl MessageSink for LoggingSink {
    async fn post(&self, message: &Message) -> Result<(), SinkError> {
        let start = std::time::Instant::now();
        let result = self.inner.post(message).await;
        let duration = start.elapsed();

        match &result {
            Ok(()) => {
                tracing::info!(
                    endpoint = %self.inner.endpoint(),
                    sender = message.sender.as_str(),
                    duration_ms = %duration.as_millis(),
                    "Message posted"
                );
            }
            Err(e) => {
                tracing::error!(
                    endpoint = %self.inner.endpoint(),
                    sender = message.sender.as_str(),
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    "Error posting message"
                );
            }
        }

        result
    }

    fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}
