//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Default filter directive when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "wsmon=info";

/// Install the global tracing subscriber.
///
/// Filter comes from `RUST_LOG`, falling back to [`DEFAULT_FILTER`]. A
/// second call is a no-op (tests and embedders may race to initialize).
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
