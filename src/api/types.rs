//! API request and response types

use crate::state_machine::{ChatState, Message, ResponseOption};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to answer the current question
#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub text: String,
}

/// Response for chat actions; the runtime applies them asynchronously
#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    pub queued: bool,
}

/// What the widget needs to render, without the log
#[derive(Debug, Clone, Serialize)]
pub struct StateView {
    pub step: u8,
    pub step_name: &'static str,
    pub is_open: bool,
    pub is_loading: bool,
    pub options: &'static [ResponseOption],
    pub can_close: bool,
    pub message_count: usize,
}

impl From<&ChatState> for StateView {
    fn from(state: &ChatState) -> Self {
        Self {
            step: state.step.index(),
            step_name: state.step.name(),
            is_open: state.is_open,
            is_loading: state.is_loading(),
            options: state.visible_options(),
            can_close: state.can_close(),
            message_count: state.messages.len(),
        }
    }
}

/// Full chat view with the message log
#[derive(Debug, Clone, Serialize)]
pub struct ChatView {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub state: StateView,
    pub messages: Vec<Message>,
}

impl ChatView {
    pub fn new(session_id: Uuid, state: &ChatState) -> Self {
        Self {
            session_id,
            state: StateView::from(state),
            messages: state.messages.clone(),
        }
    }
}

/// Version information
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub name: &'static str,
    pub version: &'static str,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
