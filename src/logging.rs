//! Diagnostics via `tracing`.
//!
//! Only binaries install a subscriber; the library just emits events.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a stderr subscriber filtered by `RUST_LOG`, defaulting to `warn`.
///
/// Output goes to stderr so stdout stays pure NDJSON.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
