//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise the level comes from the CLI
//! verbosity flag.

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber, writing to stderr so command output stays
/// pipeable.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(verbose)
        .with_writer(std::io::stderr)
        .init();
}

/// Debug-level logging captured by the test harness; safe to call repeatedly
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
