//! Diagnostic tracing, written to stderr
//!
//! User-facing output goes to stdout through [`crate::cli::CliProgress`];
//! tracing carries diagnostics only.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber
///
/// Reads `RUST_LOG`. When unset, defaults to `warn`, or to `poule=debug`
/// with `verbose`.
///
/// ```bash
/// RUST_LOG=poule=trace poule --dry-run label bug=crash
/// ```
pub fn init(verbose: bool) {
    let fallback = if verbose { "warn,poule=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
