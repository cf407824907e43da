//! Command line configuration of the server.

use std::time::Duration;

use clap::Parser;

use crate::domain::DEFAULT_SESSION_CAPACITY;

/// Real-time estimation room server
#[derive(Debug, Clone, Parser)]
#[command(name = "yosoku-server", version, about)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// Seconds between keep-alive pings sent to each client
    #[arg(long, default_value_t = 30)]
    pub heartbeat_interval_secs: u64,

    /// Seconds without any inbound frame before a connection is closed
    #[arg(long, default_value_t = 90)]
    pub idle_timeout_secs: u64,

    /// Maximum number of connections per room
    #[arg(long, default_value_t = DEFAULT_SESSION_CAPACITY)]
    pub room_capacity: usize,
}

impl ServerConfig {
    /// `host:port` to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs.max(1))
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs.max(1))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            heartbeat_interval_secs: 30,
            idle_timeout_secs: 90,
            room_capacity: DEFAULT_SESSION_CAPACITY,
        }
    }
}
