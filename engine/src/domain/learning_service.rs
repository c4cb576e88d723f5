//! Learning progress service: progress updates and progress reads.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::learning::{self, LearningPathRecord, LearningProgressReport, PathProgress};
use crate::domain::ports::{
    ActivityLog, CacheKey, DashboardCache, LearningPathRepository, LearningPathRepositoryError,
};
use crate::domain::user::UserId;

/// How many related paths [`LearningProgressService::similar_paths`]
/// returns at most.
const SIMILAR_PATH_LIMIT: usize = 3;

/// Domain service owning learning-path progress.
#[derive(Clone)]
pub struct LearningProgressService<R, A, C> {
    paths: Arc<R>,
    activity: Arc<A>,
    cache: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<R, A, C> LearningProgressService<R, A, C> {
    /// Create a new service over the given ports.
    pub fn new(paths: Arc<R>, activity: Arc<A>, cache: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            paths,
            activity,
            cache,
            clock,
        }
    }
}

impl<R, A, C> LearningProgressService<R, A, C>
where
    R: LearningPathRepository,
    A: ActivityLog,
    C: DashboardCache,
{
    /// Set a path's progress percentage.
    ///
    /// Reaching 100 marks the path completed and stamps `completed_at`
    /// exactly once; later updates never move the stamp.
    pub async fn update_progress(
        &self,
        path_id: &Uuid,
        progress: f64,
    ) -> Result<LearningPathRecord, Error> {
        if !progress.is_finite() || !(0.0..=100.0).contains(&progress) {
            return Err(
                Error::invalid_request("progress must be between 0 and 100").with_details(json!({
                    "code": "invalid_progress",
                })),
            );
        }

        let mut record = self
            .paths
            .find_by_id(path_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| path_not_found(path_id))?;

        record.progress = progress;
        if record.is_completed() && record.completed_at.is_none() {
            record.completed_at = Some(self.clock.utc());
        }
        self.paths
            .save(&record)
            .await
            .map_err(map_repository_error)?;
        info!(path = %path_id, progress, "learning progress updated");

        let today = self.clock.utc().date_naive();
        if let Err(err) = self.activity.record(&record.user_id, today).await {
            warn!(user = %record.user_id, error = %err, "activity log write failed");
        }
        let key = CacheKey::dashboard(&record.user_id);
        if let Err(err) = self.cache.evict(&key).await {
            warn!(user = %record.user_id, error = %err, "dashboard cache evict failed");
        }

        Ok(record)
    }

    /// Read a user's paths in creation order.
    pub async fn list_paths(&self, user_id: &UserId) -> Result<Vec<LearningPathRecord>, Error> {
        self.paths
            .list_for_user(user_id)
            .await
            .map_err(map_repository_error)
    }

    /// Per-path progress plus aggregate statistics.
    pub async fn progress_report(&self, user_id: &UserId) -> Result<LearningProgressReport, Error> {
        let records = self.list_paths(user_id).await?;
        Ok(LearningProgressReport {
            user_id: user_id.clone(),
            paths_progress: records.iter().map(PathProgress::from).collect(),
            statistics: learning::summarize(&records),
        })
    }

    /// Up to three other paths sharing the given path's topic.
    pub async fn similar_paths(&self, path_id: &Uuid) -> Result<Vec<LearningPathRecord>, Error> {
        let record = self
            .paths
            .find_by_id(path_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| path_not_found(path_id))?;

        let related = self
            .paths
            .list_by_topic(&record.topic)
            .await
            .map_err(map_repository_error)?;
        Ok(related
            .into_iter()
            .filter(|candidate| candidate.id != *path_id)
            .take(SIMILAR_PATH_LIMIT)
            .collect())
    }
}

pub(crate) fn map_repository_error(error: LearningPathRepositoryError) -> Error {
    match error {
        LearningPathRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("learning path repository unavailable: {message}"))
        }
        LearningPathRepositoryError::Query { message } => {
            Error::internal(format!("learning path repository error: {message}"))
        }
        LearningPathRepositoryError::Write { message } => {
            Error::internal(format!("learning path repository write failed: {message}"))
        }
    }
}

fn path_not_found(path_id: &Uuid) -> Error {
    Error::not_found("learning path not found").with_details(json!({
        "pathId": path_id,
        "code": "path_not_found",
    }))
}

#[cfg(test)]
#[path = "learning_service_tests.rs"]
mod tests;
