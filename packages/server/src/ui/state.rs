//! Server state shared by all handlers.

use std::{sync::Arc, time::Duration};

use crate::{config::ServerConfig, domain::RoomRepository, ui::message_router::MessageRouter};

/// Keep-alive settings of a connection
#[derive(Debug, Clone, Copy)]
pub struct Heartbeat {
    /// Interval between server pings
    pub interval: Duration,
    /// Connection is closed after this long without inbound frames
    pub idle_timeout: Duration,
}

/// Shared application state
pub struct AppState {
    /// Room Registry（データアクセス層の抽象化）
    pub repository: Arc<dyn RoomRepository>,
    /// Inbound message dispatch
    pub router: MessageRouter,
    pub heartbeat: Heartbeat,
}

impl AppState {
    pub fn new(repository: Arc<dyn RoomRepository>, config: &ServerConfig) -> Self {
        Self {
            router: MessageRouter::new(repository.clone()),
            repository,
            heartbeat: Heartbeat {
                interval: config.heartbeat_interval(),
                idle_timeout: config.idle_timeout(),
            },
        }
    }
}
