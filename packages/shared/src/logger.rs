//! Logger setup based on `tracing-subscriber`.

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global tracing subscriber.
///
/// The filter is read from `RUST_LOG` when present. Otherwise `default_level`
/// applies to the binary's own crate and `info` to everything else.
///
/// # Arguments
///
/// * `bin_name` - Binary name (`env!("CARGO_BIN_NAME")`), used as the filter target
/// * `default_level` - Level for the binary when `RUST_LOG` is not set (e.g. "debug")
///
/// Returns `false` if a global subscriber was already installed.
pub fn setup_logger(bin_name: &str, default_level: &str) -> bool {
    let target = bin_name.replace('-', "_");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "info,{target}={default_level},yosoku_server={default_level},tower_http=debug"
        ))
    });

    // try_init: integration tests may install a subscriber more than once
    match fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(true)
        .try_init()
    {
        Ok(()) => {
            tracing::debug!("Logger initialized for '{}'", bin_name);
            true
        }
        Err(e) => {
            tracing::debug!("Keeping the existing subscriber: {}", e);
            false
        }
    }
}
