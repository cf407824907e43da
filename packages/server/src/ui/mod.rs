//! WebSocket estimation server implementation.

mod handler;
pub mod message_router;
mod runner;
mod signal;
pub mod state;

pub use message_router::{MessageRouter, RouteError};
pub use runner::{ServerError, build_app, run};
