//! Plantation service: plant actions, provider sync, and ledger reads.

use std::sync::Arc;

use chrono::Months;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::domain::Error;
use crate::domain::carbon_service::{map_directory_error, user_not_found};
use crate::domain::plantation::{
    self, PlantationRecord, PlantationReport, PlantationStatus, PlantationSummary,
    carbon_offset_for, project_location,
};
use crate::domain::ports::{
    ActivityLog, CacheKey, DashboardCache, PlantationLedger, PlantationLedgerError,
    PlantingProvider, UserDirectory,
};
use crate::domain::user::UserId;

/// Outcome of one [`PlantationService::sync_pending`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Pending records examined.
    pub examined: u32,
    /// Records confirmed during this pass.
    pub confirmed: u32,
}

/// Domain service owning plant actions and plantation reads.
#[derive(Clone)]
pub struct PlantationService<U, L, A, C> {
    users: Arc<U>,
    ledger: Arc<L>,
    activity: Arc<A>,
    cache: Arc<C>,
    /// `None` means the external provider is disabled, which is a valid
    /// configuration, not an error.
    provider: Option<Arc<dyn PlantingProvider>>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl<U, L, A, C> PlantationService<U, L, A, C> {
    /// Create a new service over the given ports.
    pub fn new(
        users: Arc<U>,
        ledger: Arc<L>,
        activity: Arc<A>,
        cache: Arc<C>,
        provider: Option<Arc<dyn PlantingProvider>>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            users,
            ledger,
            activity,
            cache,
            provider,
            clock,
            config,
        }
    }
}

impl<U, L, A, C> PlantationService<U, L, A, C>
where
    U: UserDirectory,
    L: PlantationLedger,
    A: ActivityLog,
    C: DashboardCache,
{
    /// Record a plant action for a user.
    ///
    /// The record is written `Pending` durably before any provider call.
    /// When a provider is configured, a best-effort confirmation follows;
    /// its failure is logged and never surfaced, and the record stays
    /// `Pending` for [`Self::sync_pending`] to retry.
    pub async fn plant_trees(
        &self,
        user_id: &UserId,
        trees: u32,
        project: &str,
    ) -> Result<PlantationRecord, Error> {
        if trees == 0 {
            return Err(
                Error::invalid_request("at least one tree must be planted").with_details(json!({
                    "code": "invalid_tree_count",
                })),
            );
        }

        let profile = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_directory_error)?;
        if profile.is_none() {
            return Err(user_not_found(user_id));
        }

        let now = self.clock.utc();
        let mut record = PlantationRecord {
            id: Uuid::new_v4(),
            user_id: user_id.clone(),
            trees_planted: trees,
            project: project.to_owned(),
            location: project_location(project).to_owned(),
            cost: f64::from(trees) * self.config.cost_per_tree,
            carbon_offset: carbon_offset_for(trees),
            planted_at: now,
            status: PlantationStatus::Pending,
            external_id: None,
        };
        self.ledger
            .append(&record)
            .await
            .map_err(map_plantation_error)?;
        info!(user = %user_id, trees, project, "plantation recorded");

        if let Some(external_id) = self.try_confirm(&record).await {
            record.status = PlantationStatus::Confirmed;
            record.external_id = Some(external_id);
        }

        self.touch_activity(user_id, now.date_naive()).await;
        self.invalidate_snapshot(user_id).await;

        Ok(record)
    }

    /// Retry confirmation for every `Pending` record, each independently.
    ///
    /// A no-op when no provider is configured. One record's failure never
    /// blocks the rest of the pass.
    pub async fn sync_pending(&self) -> Result<SyncReport, Error> {
        if self.provider.is_none() {
            info!("planting provider disabled; skipping sync pass");
            return Ok(SyncReport::default());
        }

        let pending = self
            .ledger
            .list_pending()
            .await
            .map_err(map_plantation_error)?;

        let mut report = SyncReport {
            examined: pending.len() as u32,
            confirmed: 0,
        };
        for record in &pending {
            if self.try_confirm(record).await.is_some() {
                report.confirmed += 1;
                self.invalidate_snapshot(&record.user_id).await;
            }
        }
        info!(
            examined = report.examined,
            confirmed = report.confirmed,
            "plantation sync pass finished"
        );
        Ok(report)
    }

    /// Evolution series over the configured window plus all-time summary.
    pub async fn report(
        &self,
        user_id: &UserId,
        window_months: Option<u32>,
    ) -> Result<PlantationReport, Error> {
        let records = self.list_records(user_id).await?;

        let months = window_months.unwrap_or(self.config.evolution_window_months);
        let cutoff = self.clock.utc().checked_sub_months(Months::new(months));
        let windowed: Vec<PlantationRecord> = match cutoff {
            Some(cutoff) => records
                .iter()
                .filter(|record| record.planted_at >= cutoff)
                .cloned()
                .collect(),
            None => records.clone(),
        };

        Ok(PlantationReport {
            user_id: user_id.clone(),
            evolution: plantation::evolution(&windowed),
            statistics: plantation::summarize(&records),
        })
    }

    /// All-time summary statistics.
    pub async fn summary(&self, user_id: &UserId) -> Result<PlantationSummary, Error> {
        let records = self.list_records(user_id).await?;
        Ok(plantation::summarize(&records))
    }

    /// Confirm one record with the provider and persist the transition.
    /// Returns the external id on success; logs and returns `None` on any
    /// failure so callers degrade gracefully.
    async fn try_confirm(&self, record: &PlantationRecord) -> Option<String> {
        let provider = self.provider.as_ref()?;
        match provider
            .confirm_planting(record.trees_planted, &record.project, &record.user_id)
            .await
        {
            Ok(external_id) => {
                let update = self
                    .ledger
                    .update_status(
                        &record.id,
                        PlantationStatus::Confirmed,
                        Some(external_id.clone()),
                    )
                    .await;
                match update {
                    Ok(()) => {
                        info!(record = %record.id, external = %external_id, "plantation confirmed");
                        Some(external_id)
                    }
                    Err(err) => {
                        warn!(record = %record.id, error = %err, "status update failed; record stays pending");
                        None
                    }
                }
            }
            Err(err) => {
                warn!(record = %record.id, error = %err, "planting provider call failed");
                None
            }
        }
    }

    async fn list_records(&self, user_id: &UserId) -> Result<Vec<PlantationRecord>, Error> {
        self.ledger
            .list_for_user(user_id)
            .await
            .map_err(map_plantation_error)
    }

    async fn touch_activity(&self, user_id: &UserId, date: chrono::NaiveDate) {
        if let Err(err) = self.activity.record(user_id, date).await {
            warn!(user = %user_id, error = %err, "activity log write failed");
        }
    }

    async fn invalidate_snapshot(&self, user_id: &UserId) {
        let key = CacheKey::dashboard(user_id);
        if let Err(err) = self.cache.evict(&key).await {
            warn!(user = %user_id, error = %err, "dashboard cache evict failed");
        }
    }
}

pub(crate) fn map_plantation_error(error: PlantationLedgerError) -> Error {
    match error {
        PlantationLedgerError::Connection { message } => {
            Error::service_unavailable(format!("plantation ledger unavailable: {message}"))
        }
        PlantationLedgerError::Query { message } => {
            Error::internal(format!("plantation ledger error: {message}"))
        }
        PlantationLedgerError::Write { message } => {
            Error::internal(format!("plantation ledger write failed: {message}"))
        }
        PlantationLedgerError::RecordNotFound { id } => {
            Error::internal(format!("plantation record {id} vanished mid-update"))
        }
    }
}

#[cfg(test)]
#[path = "plantation_service_tests.rs"]
mod tests;
