//! Development-time tracing for debugging the repair flow.
//!
//! Diagnostics go to stderr and are controlled by `RUST_LOG`; they are not
//! part of the product output (the `FinalResult` payload and the bench
//! leaderboard are printed to stdout regardless of the filter).

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber for development logging.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=repairer=debug cargo run -- solve problem.toml
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
