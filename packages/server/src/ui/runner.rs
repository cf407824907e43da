//! Server runner: builds the router and serves it until a shutdown signal.

use std::sync::Arc;

use axum::{Router, routing::get};
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    infrastructure::repository::InMemoryRoomRepository,
    ui::{
        handler::{get_room_detail, get_rooms, health_check, websocket_handler},
        signal::shutdown_signal,
        state::AppState,
    },
};

/// Process-level failures. Only binding the listener is fatal.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Build the application router
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/{room_id}", get(get_room_detail))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server with a fresh in-memory room registry
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let repository = Arc::new(InMemoryRoomRepository::with_capacity(config.room_capacity));
    let state = Arc::new(AppState::new(repository, &config));
    let app = build_app(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("Listening on ws://{}/ws", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
