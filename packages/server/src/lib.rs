//! Real-time estimation room server.
//!
//! Clients connect over WebSocket, join a room under a display name, and see
//! story selection, votes and reveals of that room synchronized live.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use ui::{build_app, run};
