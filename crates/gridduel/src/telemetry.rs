//! Log output for binaries built on gridduel.
//!
//! The library crates only emit `tracing` events; installing a subscriber
//! is left to the application. These helpers install a plain `fmt`
//! subscriber filtered by `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber, defaulting to `info` when `RUST_LOG` is
/// unset. Does nothing if a subscriber is already installed.
pub fn init() {
    init_with("info");
}

/// Like [`init`], with a custom fallback directive such as
/// `"gridduel_session=debug"`.
pub fn init_with(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
