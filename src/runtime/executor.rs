//! Chat runtime executor

use super::queue::PersistJob;
use super::SseEvent;
use crate::state_machine::{transition, ChatContext, ChatState, Effect, Event, TransitionError};
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Owns the chat state and applies events to it one at a time
pub struct ChatRuntime {
    context: ChatContext,
    state: ChatState,
    event_rx: mpsc::Receiver<Event>,
    jobs_tx: mpsc::UnboundedSender<PersistJob>,
    state_tx: watch::Sender<ChatState>,
    broadcast_tx: broadcast::Sender<SseEvent>,
    shutdown: CancellationToken,
}

impl ChatRuntime {
    pub fn new(
        context: ChatContext,
        event_rx: mpsc::Receiver<Event>,
        jobs_tx: mpsc::UnboundedSender<PersistJob>,
        state_tx: watch::Sender<ChatState>,
        broadcast_tx: broadcast::Sender<SseEvent>,
        shutdown: CancellationToken,
    ) -> Self {
        let state = state_tx.borrow().clone();
        Self {
            context,
            state,
            event_rx,
            jobs_tx,
            state_tx,
            broadcast_tx,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        let session_id = self.context.session_id;
        tracing::info!(%session_id, "Starting chat runtime");

        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => break,
                Some(event) = self.event_rx.recv() => {
                    if let Err(e) = self.process_event(event) {
                        // Rejections are user-facing (e.g. "still saving")
                        tracing::warn!(%session_id, error = %e, "Event rejected");
                        let _ = self.broadcast_tx.send(SseEvent::Error {
                            message: e.to_string(),
                        });
                    }
                }
                else => break,
            }
        }

        tracing::info!(%session_id, "Chat runtime stopped");
    }

    fn process_event(&mut self, event: Event) -> Result<(), TransitionError> {
        if let Event::SinkAck {
            submission,
            delivered,
            ..
        } = &event
        {
            tracing::debug!(
                session_id = %self.context.session_id,
                submission,
                delivered,
                "Sink acknowledged submission"
            );
        }

        let kind = event.kind();
        let result = transition(&self.state, &self.context, event)?;
        self.state = result.new_state;

        tracing::debug!(
            session_id = %self.context.session_id,
            event = kind,
            step = self.state.step.index(),
            loading = self.state.is_loading(),
            "Applied event"
        );

        for effect in result.effects {
            self.execute_effect(effect);
        }
        Ok(())
    }

    fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::PersistMessage { message, ack } => {
                let _ = self.broadcast_tx.send(SseEvent::Message {
                    message: message.clone(),
                });
                if self.jobs_tx.send(PersistJob { message, ack }).is_err() {
                    tracing::error!(
                        session_id = %self.context.session_id,
                        "Persistence queue closed, message not stored"
                    );
                }
            }

            Effect::PublishState => {
                self.state_tx.send_replace(self.state.clone());
                let _ = self.broadcast_tx.send(SseEvent::StateChange {
                    state: self.state.clone(),
                });
            }
        }
    }
}
