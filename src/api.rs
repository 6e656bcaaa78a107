//! HTTP API for the chat widget

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;

use crate::runtime::ChatHandle;
use tokio_util::sync::CancellationToken;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub chat: ChatHandle,
    /// Fired on server shutdown; ends open event streams
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(chat: ChatHandle, shutdown: CancellationToken) -> Self {
        Self { chat, shutdown }
    }
}
