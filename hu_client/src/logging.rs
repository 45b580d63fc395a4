//! Structured logging configuration.
//!
//! Everything goes to stderr so it never interleaves with the table view on
//! stdout. Records from `hu_poker`, which logs through the `log` facade, are
//! picked up by the same subscriber.

use hu_poker::{ClientError, entities::Action};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging.
///
/// Levels come from `RUST_LOG`, defaulting to `info` with noisy transport
/// crates turned down.
///
/// # Example
///
/// ```no_run
/// use hu_client::logging;
///
/// logging::init();
/// tracing::info!("Client starting");
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tungstenite=warn,reqwest=warn,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::debug!("Logging initialized");
}

/// Log a server event that couldn't be applied.
pub fn log_dropped_event(raw: &str, error: &ClientError) {
    tracing::warn!(raw = raw, "Dropped server event: {error}");
}

/// Log a user action rejected before it reached the server.
pub fn log_rejected_action(action: Option<&Action>, reason: &str) {
    match action {
        Some(action) => tracing::info!(action = %action, "Rejected action: {reason}"),
        None => tracing::info!("Rejected input: {reason}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dropped_event() {
        // Just ensure it doesn't panic
        log_dropped_event("{}", &ClientError::malformed("envelope", "missing field"));
    }

    #[test]
    fn test_log_rejected_action() {
        log_rejected_action(Some(&Action::Bet(5_000)), "out of range");
        log_rejected_action(None, "unrecognized");
    }
}
