//! Engine configuration.

use std::time::Duration;

use serde::Deserialize;

/// Tunables consumed by the engine services.
///
/// Deserializable so hosts can source it from their own configuration
/// layer; [`Default`] gives the values the original deployment shipped
/// with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Donation cost per planted tree, in the host currency.
    pub cost_per_tree: f64,
    /// Time-to-live for cached dashboard snapshots.
    #[serde(with = "ttl_seconds")]
    pub dashboard_ttl: Duration,
    /// Default window, in months, for the plantation evolution series.
    pub evolution_window_months: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cost_per_tree: 0.10,
            dashboard_ttl: Duration::from_secs(300),
            evolution_window_months: 12,
        }
    }
}

mod ttl_seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
