//! Effects produced by state transitions

use super::state::Message;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a message to the sink. When `ack` is set the runtime reports
    /// completion back as `Event::SinkAck` with that submission id.
    PersistMessage { message: Message, ack: Option<u64> },

    /// Publish the new state to observers
    PublishState,
}

impl Effect {
    pub fn persist_user_message(message: Message, submission: u64) -> Self {
        Effect::PersistMessage {
            message,
            ack: Some(submission),
        }
    }

    pub fn persist_system_message(message: Message) -> Self {
        Effect::PersistMessage { message, ack: None }
    }
}
