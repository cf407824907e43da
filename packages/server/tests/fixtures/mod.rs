//! Test fixtures: an in-process server on an ephemeral port.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use yosoku_server::{
    ServerConfig, build_app, infrastructure::repository::InMemoryRoomRepository,
    ui::state::AppState,
};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Running server, aborted on drop
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let repository = Arc::new(InMemoryRoomRepository::with_capacity(config.room_capacity));
        let state = Arc::new(AppState::new(repository, &config));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, build_app(state))
                .await
                .expect("Test server failed");
        });
        Self { addr, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub async fn connect(&self) -> WsClient {
        let (ws, _) = connect_async(self.ws_url())
            .await
            .expect("Failed to connect WebSocket");
        ws
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn send_json(ws: &mut WsClient, value: Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .expect("Failed to send frame");
}

pub async fn send_raw(ws: &mut WsClient, text: &str) {
    ws.send(Message::Text(text.to_string().into()))
        .await
        .expect("Failed to send frame");
}

/// Next JSON text frame, skipping control frames
pub async fn next_json(ws: &mut WsClient) -> Value {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let msg = ws
                .next()
                .await
                .expect("Connection closed")
                .expect("WebSocket error");
            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).expect("Server sent invalid JSON");
            }
        }
    })
    .await
    .expect("Timed out waiting for a message")
}

/// Assert that no text frame arrives within `wait`
pub async fn expect_silence(ws: &mut WsClient, wait: Duration) {
    let result = tokio::time::timeout(wait, async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => return Some(text.to_string()),
                Some(Ok(_)) => continue,
                _ => return None,
            }
        }
    })
    .await;
    if let Ok(Some(text)) = result {
        panic!("Unexpected message: {text}");
    }
}

/// Connect and join `room` as `user`, consuming the join broadcast
pub async fn join(server: &TestServer, room: &str, user: &str) -> WsClient {
    let mut ws = server.connect().await;
    send_json(
        &mut ws,
        serde_json::json!({"type": "join", "roomId": room, "user": user}),
    )
    .await;
    let user_list = next_json(&mut ws).await;
    assert_eq!(user_list["type"], "userList");
    ws
}
