//! Tracing subscriber bootstrap for binaries and integration tests.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber, honoring `RUST_LOG`.
///
/// Defaults to `info` when `RUST_LOG` is unset. Safe to call more than
/// once; only the first call installs.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
