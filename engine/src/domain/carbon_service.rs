//! Carbon tracking service: the ledger write path and history reads.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::Error;
use crate::domain::carbon::{
    self, CarbonFootprint, CarbonHistoryReport, CarbonRecord, CarbonStatistics, DateRange,
    NewCarbonSession, Period,
};
use crate::domain::ports::{
    ActivityLog, CacheKey, CarbonLedger, CarbonLedgerError, DashboardCache, UserDirectory,
    UserDirectoryError,
};
use crate::domain::telemetry::{SessionTelemetry, session_carbon};
use crate::domain::user::UserId;

/// Domain service owning the carbon ledger write path and reads.
#[derive(Clone)]
pub struct CarbonTrackingService<U, L, A, C> {
    users: Arc<U>,
    ledger: Arc<L>,
    activity: Arc<A>,
    cache: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<U, L, A, C> CarbonTrackingService<U, L, A, C> {
    /// Create a new service over the given ports.
    pub fn new(
        users: Arc<U>,
        ledger: Arc<L>,
        activity: Arc<A>,
        cache: Arc<C>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            ledger,
            activity,
            cache,
            clock,
        }
    }
}

impl<U, L, A, C> CarbonTrackingService<U, L, A, C>
where
    U: UserDirectory,
    L: CarbonLedger,
    A: ActivityLog,
    C: DashboardCache,
{
    /// Record one completed session on the user's ledger.
    ///
    /// Telemetry is validated before any calculation; the ledger append
    /// derives the running total atomically per the
    /// [`CarbonLedger::append_session`] contract. The user's cached
    /// dashboard snapshot is evicted afterwards.
    pub async fn record_session(
        &self,
        user_id: &UserId,
        telemetry: &SessionTelemetry,
    ) -> Result<CarbonRecord, Error> {
        let estimated = session_carbon(telemetry).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({
                "code": "invalid_telemetry",
            }))
        })?;

        self.require_user(user_id).await?;

        let now = self.clock.utc();
        let session = NewCarbonSession {
            user_id: user_id.clone(),
            date: now.date_naive(),
            session_carbon: estimated,
            device_type: telemetry.device_type,
            energy_source: telemetry.energy_source,
            recorded_at: now,
        };
        let record = self
            .ledger
            .append_session(&session)
            .await
            .map_err(map_ledger_error)?;

        info!(
            user = %user_id,
            session_kg = record.session_carbon,
            total_kg = record.total_carbon,
            trees_needed = record.trees_needed,
            "session carbon recorded"
        );

        self.touch_activity(user_id, session.date).await;
        self.invalidate_snapshot(user_id).await;

        Ok(record)
    }

    /// Filtered history report; defaults to the last 30 days through
    /// today.
    pub async fn history(
        &self,
        user_id: &UserId,
        range: Option<DateRange>,
    ) -> Result<CarbonHistoryReport, Error> {
        let range = range.unwrap_or_else(|| DateRange::default_window(self.clock.utc().date_naive()));
        let records = self.list_records(user_id).await?;
        Ok(carbon::history(user_id.clone(), &records, range))
    }

    /// Window statistics for a named period ending today.
    pub async fn statistics(
        &self,
        user_id: &UserId,
        period: Period,
    ) -> Result<CarbonStatistics, Error> {
        let range = period.range_ending(self.clock.utc().date_naive());
        let records = self.list_records(user_id).await?;
        Ok(carbon::history(user_id.clone(), &records, range).statistics)
    }

    /// All-time footprint summary.
    pub async fn footprint(&self, user_id: &UserId) -> Result<CarbonFootprint, Error> {
        let records = self.list_records(user_id).await?;
        Ok(carbon::footprint(&records))
    }

    async fn list_records(&self, user_id: &UserId) -> Result<Vec<CarbonRecord>, Error> {
        self.ledger
            .list_for_user(user_id)
            .await
            .map_err(map_ledger_error)
    }

    async fn require_user(&self, user_id: &UserId) -> Result<(), Error> {
        let profile = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_directory_error)?;
        if profile.is_none() {
            return Err(user_not_found(user_id));
        }
        Ok(())
    }

    /// Best-effort: a lost activity entry costs at most one streak day.
    async fn touch_activity(&self, user_id: &UserId, date: chrono::NaiveDate) {
        if let Err(err) = self.activity.record(user_id, date).await {
            warn!(user = %user_id, error = %err, "activity log write failed");
        }
    }

    /// Best-effort: a failed evict leaves a stale snapshot for at most
    /// the cache TTL.
    async fn invalidate_snapshot(&self, user_id: &UserId) {
        let key = CacheKey::dashboard(user_id);
        if let Err(err) = self.cache.evict(&key).await {
            warn!(user = %user_id, error = %err, "dashboard cache evict failed");
        }
    }
}

pub(crate) fn map_ledger_error(error: CarbonLedgerError) -> Error {
    match error {
        CarbonLedgerError::Connection { message } => {
            Error::service_unavailable(format!("carbon ledger unavailable: {message}"))
        }
        CarbonLedgerError::Query { message } => {
            Error::internal(format!("carbon ledger error: {message}"))
        }
        CarbonLedgerError::Write { message } => {
            Error::internal(format!("carbon ledger append failed: {message}"))
        }
    }
}

pub(crate) fn map_directory_error(error: UserDirectoryError) -> Error {
    match error {
        UserDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
    }
}

pub(crate) fn user_not_found(user_id: &UserId) -> Error {
    Error::not_found("user not found").with_details(json!({
        "userId": user_id,
        "code": "user_not_found",
    }))
}

#[cfg(test)]
#[path = "carbon_service_tests.rs"]
mod tests;
