//! Diagnostic tracing for the roster CLI.
//!
//! Tracing output goes to stderr and is controlled by `RUST_LOG`. Command
//! results (ranked lists, export paths) go to stdout and are unaffected.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG` env var. Defaults to `warn` if unset, which still
/// surfaces storage recovery warnings.
///
/// # Example
/// ```bash
/// RUST_LOG=roster=debug roster list
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
