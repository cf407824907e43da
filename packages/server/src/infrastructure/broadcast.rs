//! Broadcast Dispatcher.
//!
//! Fan-out only enqueues onto each session's outbound queue. The socket write
//! happens in the connection's writer task, so a stalled client never blocks
//! the room.

use std::sync::Arc;

use crate::{
    domain::{ClientSender, Room, RoomId, RoomRepository},
    infrastructure::dto::websocket::ServerMessage,
};

/// Outcome of one fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Sessions the message was queued for
    pub delivered: usize,
    /// Sessions whose connection is already gone
    pub skipped: usize,
}

/// Delivers server messages to the sessions of a room.
///
/// Use cases call the associated [`Broadcaster::fan_out`] and
/// [`Broadcaster::send_to`] directly; an instance is only needed to broadcast
/// by room id.
#[derive(Clone)]
pub struct Broadcaster {
    repository: Arc<dyn RoomRepository>,
}

impl Broadcaster {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// Look up `room_id` and deliver `message` to every session in it.
    ///
    /// For callers that do not already hold the room. The use cases mutate
    /// and call [`Broadcaster::fan_out`] under one lock instead.
    ///
    /// Returns `None` when the room does not exist.
    pub async fn broadcast(&self, room_id: &RoomId, message: &ServerMessage) -> Option<DeliveryReport> {
        let shared = self.repository.find(room_id).await?;
        let room = shared.lock().await;
        Some(Self::fan_out(&room, message))
    }

    /// Deliver `message` to every active session of `room`.
    ///
    /// Call while holding the room lock so that deltas reach every session in
    /// mutation order.
    pub fn fan_out(room: &Room, message: &ServerMessage) -> DeliveryReport {
        let Some(payload) = encode(message) else {
            return DeliveryReport::default();
        };

        let mut report = DeliveryReport::default();
        for (session_id, handle) in room.sessions() {
            if handle.sender.send(payload.clone()).is_err() {
                tracing::warn!(
                    "Skipping closed session '{}' ({}) in room '{}'",
                    session_id,
                    handle.user,
                    room.id
                );
                report.skipped += 1;
            } else {
                report.delivered += 1;
            }
        }
        tracing::debug!(
            "Broadcast to room '{}': delivered={}, skipped={}",
            room.id,
            report.delivered,
            report.skipped
        );
        report
    }

    /// Send `message` to a single session.
    ///
    /// Returns `false` if the connection is gone.
    pub fn send_to(sender: &ClientSender, message: &ServerMessage) -> bool {
        match encode(message) {
            Some(payload) => sender.send(payload).is_ok(),
            None => false,
        }
    }
}

fn encode(message: &ServerMessage) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(payload) => Some(payload),
        Err(e) => {
            tracing::error!("Failed to encode {:?}: {}", message, e);
            None
        }
    }
}
