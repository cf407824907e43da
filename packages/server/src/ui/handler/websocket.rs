//! WebSocket connection handlers (Connection Gateway).

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionSession, SessionIdFactory},
    ui::{
        message_router::MessageRouter,
        state::{AppState, Heartbeat},
    },
    usecase::LeaveRoomUseCase,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this session to receive room broadcasts
    let (tx, rx) = mpsc::unbounded_channel();
    let mut session = ConnectionSession::new(SessionIdFactory::generate(), tx);
    let session_id = session.id();
    tracing::info!("Session '{}' connected", session_id);

    // Spawn a task to forward queued messages (and keep-alive pings) to this client
    let mut send_task = tokio::spawn(write_loop(sender, rx, state.heartbeat));

    // If either side completes, the connection is over
    tokio::select! {
        _ = read_loop(&mut receiver, &mut session, &state.router, state.heartbeat) => {},
        _ = &mut send_task => {
            tracing::info!("Session '{}' is no longer writable", session_id);
        },
    };
    send_task.abort();

    // Use LeaveRoomUseCase to handle disconnection
    match LeaveRoomUseCase::new(state.repository.clone())
        .execute(&mut session)
        .await
    {
        Ok(Some(outcome)) => {
            tracing::info!(
                "Session '{}' disconnected from room '{}' ({} member(s) left{})",
                session_id,
                outcome.room_id,
                outcome.remaining.len(),
                if outcome.room_removed { ", room removed" } else { "" }
            );
        }
        Ok(None) => {
            tracing::info!("Session '{}' disconnected before joining", session_id);
        }
        Err(e) => {
            tracing::warn!("Failed to clean up session '{}': {}", session_id, e);
        }
    }
}

/// Receive frames until the client closes, errors or stays silent too long.
async fn read_loop(
    receiver: &mut SplitStream<WebSocket>,
    session: &mut ConnectionSession,
    router: &MessageRouter,
    heartbeat: Heartbeat,
) {
    loop {
        let msg = match tokio::time::timeout(heartbeat.idle_timeout, receiver.next()).await {
            Ok(Some(Ok(msg))) => msg,
            Ok(Some(Err(e))) => {
                tracing::warn!("WebSocket error on session '{}': {}", session.id(), e);
                break;
            }
            Ok(None) => break,
            Err(_) => {
                tracing::info!(
                    "Session '{}' idle for {:?}, closing",
                    session.id(),
                    heartbeat.idle_timeout
                );
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                tracing::debug!("Received text from '{}': {}", session.id(), text);
                if let Err(e) = router.handle_text(session, text.as_str()).await {
                    tracing::warn!("Dropped frame from session '{}': {}", session.id(), e);
                }
            }
            Message::Binary(_) => {
                tracing::warn!(
                    "Dropped binary frame from session '{}': only text frames are supported",
                    session.id()
                );
            }
            Message::Ping(_) | Message::Pong(_) => {
                // Ping/pong replies are handled by the WebSocket protocol; receiving one is enough to stay alive
                tracing::trace!("Heartbeat from '{}'", session.id());
            }
            Message::Close(_) => {
                tracing::info!("Session '{}' requested close", session.id());
                break;
            }
        }
    }
}

/// Write queued messages to the socket and ping the client periodically.
async fn write_loop(
    mut sender: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<String>,
    heartbeat: Heartbeat,
) {
    let mut ticker = tokio::time::interval(heartbeat.interval);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            queued = rx.recv() => {
                let Some(payload) = queued else { break };
                if let Err(e) = sender.send(Message::Text(payload.into())).await {
                    tracing::debug!("Failed to write to client: {}", e);
                    break;
                }
            }
            _ = ticker.tick() => {
                if sender.send(Message::Ping(Default::default())).await.is_err() {
                    break;
                }
            }
        }
    }
    let _ = sender.close().await;
}
