//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Installs a formatted subscriber honoring `RUST_LOG`, defaulting to `info`
/// with debug output for this crate. Safe to call more than once; subsequent
/// calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,acetate=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
