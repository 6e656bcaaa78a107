//! Pure state transition function
//!
//! Given the same state and event this always produces the same result; the
//! runtime performs every side effect listed in `TransitionResult::effects`.

use super::state::{ChatContext, ChatState, Message, Step};
use super::{Effect, Event};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A response is still being saved, wait for it to finish")]
    Busy,
    #[error("Chat is closed, open it first")]
    ChatClosed,
    #[error("Chat can only be closed once the questionnaire is finished (at step {step})")]
    CloseUnavailable { step: u8 },
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
pub fn transition(
    state: &ChatState,
    _context: &ChatContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state.is_open, state.pending, event) {
        // ============================================================
        // Session lifecycle
        // ============================================================

        // Closed + Open -> restart the script, keep the log
        (false, _, Event::Open { at }) => {
            let welcome = Message::system(Step::AskClass.prompt(), at);
            let mut next = state.clone();
            next.is_open = true;
            next.step = Step::AskClass;
            next.pending = None;
            next.messages.push(welcome.clone());

            Ok(TransitionResult::new(next)
                .with_effect(Effect::persist_system_message(welcome))
                .with_effect(Effect::PublishState))
        }

        // Already open: nothing to do
        (true, _, Event::Open { .. }) => Ok(TransitionResult::new(state.clone())),

        (true, _, Event::Close) if state.step.is_terminal() => {
            let mut next = state.clone();
            next.is_open = false;
            Ok(TransitionResult::new(next).with_effect(Effect::PublishState))
        }

        (true, _, Event::Close) => Err(TransitionError::CloseUnavailable {
            step: state.step.index(),
        }),

        (false, _, Event::Close) => Err(TransitionError::InvalidTransition(
            "chat is not open".to_string(),
        )),

        // ============================================================
        // User responses
        // ============================================================

        (false, _, Event::UserResponse { .. }) => Err(TransitionError::ChatClosed),

        (true, Some(_), Event::UserResponse { .. }) => Err(TransitionError::Busy),

        // Any text is accepted; the offered options only constrain the UI
        (true, None, Event::UserResponse { text, at }) => {
            let submission = state.next_submission;
            let message = Message::user(text, at);
            let mut next = state.clone();
            next.pending = Some(submission);
            next.next_submission = submission + 1;
            next.messages.push(message.clone());

            Ok(TransitionResult::new(next)
                .with_effect(Effect::persist_user_message(message, submission))
                .with_effect(Effect::PublishState))
        }

        // ============================================================
        // Sink acknowledgements
        // ============================================================

        // Delivery failures advance too; the sink is best effort
        (_, Some(pending), Event::SinkAck { submission, at, .. }) if pending == submission => {
            let mut next = state.clone();
            next.pending = None;

            let prompt = state.step.next().map(|step| {
                let prompt = Message::system(step.prompt(), at);
                next.step = step;
                next.messages.push(prompt.clone());
                prompt
            });

            let mut result = TransitionResult::new(next);
            if let Some(prompt) = prompt {
                result = result.with_effect(Effect::persist_system_message(prompt));
            }
            Ok(result.with_effect(Effect::PublishState))
        }

        // Stale ack (session was reset since): ignore
        (_, _, Event::SinkAck { .. }) => Ok(TransitionResult::new(state.clone())),
    }
}
