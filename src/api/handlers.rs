//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{ChatView, ErrorResponse, QueuedResponse, RespondRequest, VersionResponse};
use super::AppState;
use crate::runtime::RuntimeError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Current view
        .route("/api/chat", get(get_chat))
        // Live updates
        .route("/api/chat/stream", get(stream_chat))
        // User actions
        .route("/api/chat/open", post(open_chat))
        .route("/api/chat/respond", post(respond))
        .route("/api/chat/close", post(close_chat))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Views
// ============================================================

async fn get_chat(State(state): State<AppState>) -> Json<ChatView> {
    let chat = &state.chat;
    Json(ChatView::new(chat.session_id(), &chat.snapshot()))
}

async fn stream_chat(State(state): State<AppState>) -> impl IntoResponse {
    // Subscribe before taking the snapshot so no update falls in between
    let broadcast_rx = state.chat.subscribe();
    let init = ChatView::new(state.chat.session_id(), &state.chat.snapshot());
    sse_stream(init, broadcast_rx, state.shutdown)
}

// ============================================================
// User Actions
// ============================================================

async fn open_chat(State(state): State<AppState>) -> Result<Json<QueuedResponse>, AppError> {
    state.chat.open().await?;
    Ok(Json(QueuedResponse { queued: true }))
}

async fn respond(
    State(state): State<AppState>,
    Json(req): Json<RespondRequest>,
) -> Result<Json<QueuedResponse>, AppError> {
    state.chat.respond(req.text).await?;
    Ok(Json(QueuedResponse { queued: true }))
}

async fn close_chat(State(state): State<AppState>) -> Result<Json<QueuedResponse>, AppError> {
    state.chat.close().await?;
    Ok(Json(QueuedResponse { queued: true }))
}

async fn get_version() -> Json<VersionResponse> {
    Json(VersionResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    Internal(String),
}

impl From<RuntimeError> for AppError {
    fn from(e: RuntimeError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
