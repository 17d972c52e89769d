//! Logging setup on top of `tracing-subscriber`.
//!
//! The filter comes from `RUST_LOG` (default `info`), for example
//! `RUST_LOG=forge_store=debug` to see each persisted aggregate.

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global fmt subscriber. Call once, early in `main`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Debug-level subscriber routed through the test writer. Safe to call from
/// every test.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
