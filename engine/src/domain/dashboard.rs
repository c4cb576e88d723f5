//! Dashboard orchestrator.
//!
//! The only coordinating piece of the engine: it loads the three record
//! sequences plus the activity log for one user, runs the aggregators,
//! then the rule engines and the score composer, and assembles the final
//! snapshot. Computation is read-only with respect to the ledgers; the
//! sole side effect is the best-effort snapshot cache.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::domain::Error;
use crate::domain::activity::streak_days;
use crate::domain::carbon::{self, CarbonFootprint};
use crate::domain::carbon_service::{map_directory_error, map_ledger_error, user_not_found};
use crate::domain::insights::{Badge, Recommendation, RuleContext, badges, eco_score, recommend};
use crate::domain::learning::{self, LearningStats};
use crate::domain::learning_service::map_repository_error;
use crate::domain::plantation::{self, PlantationSummary};
use crate::domain::plantation_service::map_plantation_error;
use crate::domain::ports::{
    ActivityLog, ActivityLogError, CacheKey, CarbonLedger, DashboardCache, LearningPathRepository,
    PlantationLedger, UserDirectory,
};
use crate::domain::user::UserId;

/// Composite engagement snapshot handed to the presentation layer.
///
/// Recomputed on every request; a cached copy may exist in the cache
/// collaborator and is evicted whenever any of the user's three record
/// sequences changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// Owning user.
    pub user_id: UserId,
    /// Learning-path aggregate.
    pub learning_stats: LearningStats,
    /// All-time carbon footprint aggregate.
    pub carbon_stats: CarbonFootprint,
    /// Plantation aggregate.
    pub plantation_stats: PlantationSummary,
    /// Suggested next actions, in rule order.
    pub recommendations: Vec<Recommendation>,
    /// Earned achievements; set semantics, no ordering contract.
    pub badges: Vec<Badge>,
    /// Bounded engagement score in `[0, 100]`.
    pub eco_score: u8,
    /// Consecutive active days ending today.
    pub streak_days: u32,
    /// When this snapshot was computed.
    pub generated_at: DateTime<Utc>,
}

/// The driven ports the orchestrator consumes, bundled for wiring.
#[derive(Clone)]
pub struct DashboardPorts {
    /// User existence checks.
    pub users: Arc<dyn UserDirectory>,
    /// Carbon ledger reads.
    pub carbon: Arc<dyn CarbonLedger>,
    /// Plantation ledger reads.
    pub plantations: Arc<dyn PlantationLedger>,
    /// Learning-path reads.
    pub learning: Arc<dyn LearningPathRepository>,
    /// Activity-date log reads.
    pub activity: Arc<dyn ActivityLog>,
    /// Snapshot cache.
    pub cache: Arc<dyn DashboardCache>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
}

/// Orchestrating service assembling [`DashboardSnapshot`]s.
#[derive(Clone)]
pub struct DashboardService {
    ports: DashboardPorts,
    config: EngineConfig,
}

impl DashboardService {
    /// Create a new orchestrator over the given ports.
    pub fn new(ports: DashboardPorts, config: EngineConfig) -> Self {
        Self { ports, config }
    }

    /// Compute (or serve from cache) the dashboard for one user.
    ///
    /// Fails with a not-found error when the user has no profile. Cache
    /// read and write failures degrade to recomputation and are never
    /// surfaced.
    pub async fn dashboard(&self, user_id: &UserId) -> Result<DashboardSnapshot, Error> {
        let key = CacheKey::dashboard(user_id);
        if let Some(snapshot) = self.cached(&key).await {
            debug!(user = %user_id, "dashboard served from cache");
            return Ok(snapshot);
        }

        let profile = self
            .ports
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_directory_error)?;
        if profile.is_none() {
            return Err(user_not_found(user_id));
        }

        let carbon_records = self
            .ports
            .carbon
            .list_for_user(user_id)
            .await
            .map_err(map_ledger_error)?;
        let plantation_records = self
            .ports
            .plantations
            .list_for_user(user_id)
            .await
            .map_err(map_plantation_error)?;
        let learning_records = self
            .ports
            .learning
            .list_for_user(user_id)
            .await
            .map_err(map_repository_error)?;
        let activity_dates = self
            .ports
            .activity
            .list_dates(user_id)
            .await
            .map_err(map_activity_error)?;

        let now = self.ports.clock.utc();
        let learning_stats = learning::summarize(&learning_records);
        let carbon_stats = carbon::footprint(&carbon_records);
        let plantation_stats = plantation::summarize(&plantation_records);
        let streak = streak_days(&activity_dates, now.date_naive());

        let ctx = RuleContext {
            learning: &learning_stats,
            carbon: &carbon_stats,
            plantation: &plantation_stats,
            streak_days: streak,
        };
        let snapshot = DashboardSnapshot {
            user_id: user_id.clone(),
            recommendations: recommend(&ctx),
            badges: badges(&ctx),
            eco_score: eco_score(&learning_stats, &carbon_stats, &plantation_stats),
            learning_stats,
            carbon_stats,
            plantation_stats,
            streak_days: streak,
            generated_at: now,
        };

        self.store(&key, &snapshot).await;
        Ok(snapshot)
    }

    /// Best-effort cache read; any failure means a recompute.
    async fn cached(&self, key: &CacheKey) -> Option<DashboardSnapshot> {
        match self.ports.cache.get(key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(snapshot) => Some(snapshot),
                Err(err) => {
                    warn!(key = %key, error = %err, "cached snapshot unreadable; recomputing");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(key = %key, error = %err, "cache read failed; recomputing");
                None
            }
        }
    }

    /// Best-effort cache write.
    async fn store(&self, key: &CacheKey, snapshot: &DashboardSnapshot) {
        let value = match serde_json::to_value(snapshot) {
            Ok(value) => value,
            Err(err) => {
                warn!(key = %key, error = %err, "snapshot serialisation failed; not cached");
                return;
            }
        };
        if let Err(err) = self
            .ports
            .cache
            .put(key, &value, self.config.dashboard_ttl)
            .await
        {
            warn!(key = %key, error = %err, "snapshot cache write failed");
        }
    }
}

fn map_activity_error(error: ActivityLogError) -> Error {
    match error {
        ActivityLogError::Connection { message } => {
            Error::service_unavailable(format!("activity log unavailable: {message}"))
        }
        ActivityLogError::Query { message } => {
            Error::internal(format!("activity log error: {message}"))
        }
        ActivityLogError::Write { message } => {
            Error::internal(format!("activity log write failed: {message}"))
        }
    }
}

#[cfg(test)]
#[path = "dashboard_tests.rs"]
mod tests;
