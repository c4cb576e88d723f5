//! Tracing bootstrap for embedding binaries.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the JSON tracing subscriber, filtered by `RUST_LOG`.
///
/// Embedding services call this once at startup. A second call (or a
/// subscriber installed by the host) is reported and otherwise ignored so
/// the engine never aborts its host over logging.
pub fn init() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}
