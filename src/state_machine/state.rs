//! Chat state types

use super::script::{self, ResponseOption};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Messages
// ============================================================================

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    System,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::System => "system",
        }
    }
}

/// A single entry in the chat log. This is also the body posted to the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub message: String,
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            sender: Sender::User,
            message: text.into(),
            timestamp: at,
        }
    }

    pub fn system(text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            sender: Sender::System,
            message: text.into(),
            timestamp: at,
        }
    }
}

/// ISO-8601 timestamps with millisecond precision and a `Z` suffix
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Script position
// ============================================================================

/// Position in the questionnaire
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Step {
    #[default]
    AskClass,
    AskExam,
    AskSubject,
    /// Terminal; only the close action is offered
    Finished,
}

impl Step {
    #[cfg(test)]
    pub const ALL: [Step; 4] = [Step::AskClass, Step::AskExam, Step::AskSubject, Step::Finished];

    /// Numeric index as shown to clients (0..=3)
    pub fn index(self) -> u8 {
        match self {
            Step::AskClass => 0,
            Step::AskExam => 1,
            Step::AskSubject => 2,
            Step::Finished => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Step::AskClass => "ask_class",
            Step::AskExam => "ask_exam",
            Step::AskSubject => "ask_subject",
            Step::Finished => "finished",
        }
    }

    /// Prompt emitted when the conversation enters this step
    pub fn prompt(self) -> &'static str {
        script::entry(self).prompt
    }

    /// Responses offered to the user while at this step
    pub fn options(self) -> &'static [ResponseOption] {
        script::entry(self).options
    }

    /// Step reached after a completed round-trip, `None` when terminal
    pub fn next(self) -> Option<Step> {
        script::entry(self).next
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

// ============================================================================
// Chat State
// ============================================================================

/// Everything the controller knows about the running chat
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatState {
    pub step: Step,
    pub is_open: bool,
    /// Submission whose sink acknowledgement is outstanding
    pub pending: Option<u64>,
    /// Id handed to the next accepted user response
    pub next_submission: u64,
    /// Append-only, in insertion order
    pub messages: Vec<Message>,
}

impl ChatState {
    /// Loading indicator: a user submission awaits its acknowledgement
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the close action is offered
    pub fn can_close(&self) -> bool {
        self.is_open && self.step.is_terminal()
    }

    /// Options currently shown; empty while closed
    pub fn visible_options(&self) -> &'static [ResponseOption] {
        if self.is_open {
            self.step.options()
        } else {
            &[]
        }
    }
}

/// Context for a chat session (immutable configuration)
#[derive(Debug, Clone)]
pub struct ChatContext {
    pub session_id: Uuid,
}

impl ChatContext {
    pub fn new(session_id: Uuid) -> Self {
        Self { session_id }
    }

    pub fn generate() -> Self {
        Self::new(Uuid::new_v4())
    }
}
