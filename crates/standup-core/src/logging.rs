//! Tracing subscriber setup for binaries.

use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber with an `info` default.
///
/// `RUST_LOG` overrides the default filter. Safe to call more than once;
/// later calls are no-ops.
pub fn init() {
    init_with_filter("info");
}

/// Initialise the global tracing subscriber with an explicit default filter.
pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
