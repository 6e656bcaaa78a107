//! Events that can occur in a chat session

use chrono::{DateTime, Utc};

/// Events that trigger state transitions
///
/// Timestamps are stamped by whoever produces the event so that
/// `transition` never reads the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User events
    Open {
        at: DateTime<Utc>,
    },
    UserResponse {
        text: String,
        at: DateTime<Utc>,
    },
    Close,

    // Sink events
    /// Persistence of a user submission finished, successfully or not
    SinkAck {
        submission: u64,
        delivered: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Open { .. } => "open",
            Event::UserResponse { .. } => "user_response",
            Event::Close => "close",
            Event::SinkAck { .. } => "sink_ack",
        }
    }
}
