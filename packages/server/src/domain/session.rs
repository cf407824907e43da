//! Connection Session: the server-side record of one live client connection.

use tokio::sync::mpsc::UnboundedSender;

use super::value_object::{RoomId, SessionId, UserName};

/// Outbound queue of one connection. Frames pushed here are written to the
/// socket by the connection's writer task.
pub type ClientSender = UnboundedSender<String>;

/// Lifecycle phase of a connection session.
///
/// `Unjoined -> Joined -> Closed`, or `Unjoined -> Closed`. `Closed` is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Unjoined,
    Joined { room_id: RoomId, user: UserName },
    Closed,
}

/// One client's connection state: identity claimed at join time and the room it
/// belongs to.
#[derive(Debug)]
pub struct ConnectionSession {
    id: SessionId,
    sender: ClientSender,
    phase: SessionPhase,
}

impl ConnectionSession {
    /// Create an unjoined session
    pub fn new(id: SessionId, sender: ClientSender) -> Self {
        Self {
            id,
            sender,
            phase: SessionPhase::Unjoined,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn sender(&self) -> &ClientSender {
        &self.sender
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_unjoined(&self) -> bool {
        matches!(self.phase, SessionPhase::Unjoined)
    }

    /// Room and display name of a joined session, `None` otherwise.
    pub fn membership(&self) -> Option<(&RoomId, &UserName)> {
        match &self.phase {
            SessionPhase::Joined { room_id, user } => Some((room_id, user)),
            _ => None,
        }
    }

    /// Transition `Unjoined -> Joined`.
    ///
    /// Returns `false` (and leaves the phase untouched) when the session is not
    /// unjoined: the display name is immutable once set.
    pub fn mark_joined(&mut self, room_id: RoomId, user: UserName) -> bool {
        if !self.is_unjoined() {
            return false;
        }
        self.phase = SessionPhase::Joined { room_id, user };
        true
    }

    /// Transition to `Closed`, returning the membership the session had.
    pub fn close(&mut self) -> Option<(RoomId, UserName)> {
        match std::mem::replace(&mut self.phase, SessionPhase::Closed) {
            SessionPhase::Joined { room_id, user } => Some((room_id, user)),
            _ => None,
        }
    }
}
