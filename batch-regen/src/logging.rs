//! Tracing setup for the `batch-regen` binary.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `info` so each regenerated directory is reported.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=batch_regen=debug batch-regen --root cbmc/proofs
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
