//! studychat - scripted study-plan questionnaire
//!
//! Walks a visitor through class, exam and subject questions and appends
//! every exchanged message to an external store.

mod api;
mod config;
mod runtime;
mod sink;
mod state_machine;

use api::{create_router, AppState};
use config::ChatConfig;
use sink::HttpSink;
use state_machine::ChatContext;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studychat=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = ChatConfig::from_env()?;
    tracing::info!(
        sink_url = %config.sink_url,
        sink_timeout_secs = config.sink_timeout.map(|t| t.as_secs()),
        "Configured message sink"
    );

    let sink = Arc::new(HttpSink::new(config.sink_url.clone(), config.sink_timeout)?);
    let shutdown = CancellationToken::new();
    let context = ChatContext::generate();
    let (chat, chat_task) = runtime::spawn_chat(context, sink, shutdown.clone());

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(AppState::new(chat, shutdown.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("studychat listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let signal = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            signal.cancel();
        })
        .await?;

    // Let queued messages reach the sink before exiting
    shutdown.cancel();
    chat_task.await?;
    tracing::info!("Shut down cleanly");

    Ok(())
}
