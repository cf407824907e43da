//! Real-time estimation room server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin yosoku-server -- --port 8080
//! ```

use clap::Parser;
use yosoku_server::ServerConfig;
use yosoku_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    // Run the server
    if let Err(e) = yosoku_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
