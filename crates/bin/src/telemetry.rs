//! Log subscriber setup.

use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Build the filter: `RUST_LOG` when set, else `level`.
pub(crate) fn filter(level: &str) -> Result<EnvFilter, BoxError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(level)?),
    }
}

/// Install a compact stderr subscriber. Call once, before any work.
pub(crate) fn init(level: &str) -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(level)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
}
