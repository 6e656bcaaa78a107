//! Runtime for the chat session
//!
//! The runtime task owns the state and runs the transition function; a
//! separate persistence queue talks to the sink. Everything else reaches the
//! chat through a cloneable `ChatHandle`.

mod executor;
mod queue;


pub use executor::ChatRuntime;
use queue::run_persistence_queue;

use crate::sink::{LoggingSink, MessageSink};
use crate::state_machine::{ChatContext, ChatState, Event, Message};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Events sent to SSE clients
#[derive(Debug, Clone)]
pub enum SseEvent {
    Message { message: Message },
    StateChange { state: ChatState },
    Error { message: String },
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Chat runtime has stopped")]
    Stopped,
}

/// Handle to interact with the running chat
#[derive(Clone)]
pub struct ChatHandle {
    session_id: Uuid,
    event_tx: mpsc::Sender<Event>,
    state_rx: watch::Receiver<ChatState>,
    broadcast_tx: broadcast::Sender<SseEvent>,
}

impl ChatHandle {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Send an event to the runtime
    pub async fn send_event(&self, event: Event) -> Result<(), RuntimeError> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| RuntimeError::Stopped)
    }

    pub async fn open(&self) -> Result<(), RuntimeError> {
        self.send_event(Event::Open { at: Utc::now() }).await
    }

    pub async fn respond(&self, text: impl Into<String>) -> Result<(), RuntimeError> {
        self.send_event(Event::UserResponse {
            text: text.into(),
            at: Utc::now(),
        })
        .await
    }

    pub async fn close(&self) -> Result<(), RuntimeError> {
        self.send_event(Event::Close).await
    }

    /// Latest published state
    pub fn snapshot(&self) -> ChatState {
        self.state_rx.borrow().clone()
    }

    /// Watch published states
    #[cfg(test)]
    pub fn watch_state(&self) -> watch::Receiver<ChatState> {
        self.state_rx.clone()
    }

    /// Subscribe to chat updates
    pub fn subscribe(&self) -> broadcast::Receiver<SseEvent> {
        self.broadcast_tx.subscribe()
    }
}

/// Start the runtime and its persistence queue.
///
/// The returned task finishes once `shutdown` fires and every queued
/// message has been handed to the sink.
pub fn spawn_chat(
    context: ChatContext,
    sink: Arc<dyn MessageSink>,
    shutdown: CancellationToken,
) -> (ChatHandle, JoinHandle<()>) {
    let (event_tx, event_rx) = mpsc::channel(32);
    let (jobs_tx, jobs_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(ChatState::default());
    let (broadcast_tx, _) = broadcast::channel(128);

    let handle = ChatHandle {
        session_id: context.session_id,
        event_tx: event_tx.clone(),
        state_rx,
        broadcast_tx: broadcast_tx.clone(),
    };

    let queue = tokio::spawn(run_persistence_queue(
        LoggingSink::new(sink),
        jobs_rx,
        event_tx,
    ));

    let runtime = ChatRuntime::new(context, event_rx, jobs_tx, state_tx, broadcast_tx, shutdown);
    let task = tokio::spawn(async move {
        runtime.run().await;
        if let Err(e) = queue.await {
            tracing::error!(error = %e, "Persistence queue task failed");
        }
    });

    (handle, task)
}
