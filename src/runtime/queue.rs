//! Persistence queue
//!
//! A single consumer drains jobs in order, so at most one sink post is in
//! flight and the store sees messages in log order.

use crate::sink::MessageSink;
use crate::state_machine::{Event, Message};
use chrono::Utc;
use tokio::sync::mpsc;

/// One message waiting to be posted
#[derive(Debug, Clone)]
pub struct PersistJob {
    pub message: Message,
    /// Submission to acknowledge once the post resolves
    pub ack: Option<u64>,
}

/// Drain `jobs` until every sender is dropped.
///
/// Acks are best effort: if the runtime has already stopped the remaining
/// jobs are still posted.
pub async fn run_persistence_queue<S: MessageSink>(
    sink: S,
    mut jobs: mpsc::UnboundedReceiver<PersistJob>,
    event_tx: mpsc::Sender<Event>,
) {
    while let Some(job) = jobs.recv().await {
        let delivered = match sink.post(&job.message).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Continuing without stored message");
                false
            }
        };

        if let Some(submission) = job.ack {
            let ack = Event::SinkAck {
                submission,
                delivered,
                at: Utc::now(),
            };
            if event_tx.send(ack).await.is_err() {
                tracing::debug!(submission, "Runtime gone, dropping sink ack");
            }
        }
    }

    tracing::debug!("Persistence queue drained");
}
