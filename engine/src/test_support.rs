//! In-memory port adapters for tests.
//!
//! These back the integration tests and any embedder test suite that
//! enables the `test-support` feature. They hold plain mutex-guarded
//! maps; the carbon ledger keeps its lock across the read-total-then-
//! append sequence, which is exactly the serialisation the
//! [`crate::domain::ports::CarbonLedger`] contract demands.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, Utc};
use mockable::Clock;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::carbon::{CarbonRecord, NewCarbonSession, trees_needed};
use crate::domain::learning::LearningPathRecord;
use crate::domain::plantation::{PlantationRecord, PlantationStatus};
use crate::domain::ports::{
    ActivityLog, ActivityLogError, CacheKey, CarbonLedger, CarbonLedgerError, DashboardCache,
    DashboardCacheError, LearningPathRepository, LearningPathRepositoryError, PlantationLedger,
    PlantationLedgerError, UserDirectory, UserDirectoryError,
};
use crate::domain::user::{UserId, UserProfile};

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl FixtureClock {
    /// Pin the clock to `utc_now`.
    pub fn at(utc_now: DateTime<Utc>) -> Self {
        Self { utc_now }
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// In-memory user directory.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: Mutex<HashMap<UserId, UserProfile>>,
}

impl InMemoryUserDirectory {
    /// Register a profile.
    pub fn insert(&self, profile: UserProfile) {
        let mut guard = self.users.lock().expect("directory poisoned");
        guard.insert(profile.id.clone(), profile);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, UserDirectoryError> {
        let guard = self.users.lock().expect("directory poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// In-memory carbon ledger upholding the per-user append contract.
#[derive(Default)]
pub struct InMemoryCarbonLedger {
    records: Mutex<HashMap<UserId, Vec<CarbonRecord>>>,
}

#[async_trait]
impl CarbonLedger for InMemoryCarbonLedger {
    async fn append_session(
        &self,
        session: &NewCarbonSession,
    ) -> Result<CarbonRecord, CarbonLedgerError> {
        // One lock across read-total and append: concurrent appends for
        // the same user serialise here.
        let mut guard = self.records.lock().expect("ledger poisoned");
        let user_records = guard.entry(session.user_id.clone()).or_default();
        let previous_total = user_records
            .last()
            .map(|record| record.total_carbon)
            .unwrap_or(0.0);
        let total = previous_total + session.session_carbon;
        let record = CarbonRecord {
            user_id: session.user_id.clone(),
            date: session.date,
            session_carbon: session.session_carbon,
            total_carbon: total,
            trees_needed: trees_needed(total),
            device_type: session.device_type,
            energy_source: session.energy_source,
            recorded_at: session.recorded_at,
        };
        user_records.push(record.clone());
        Ok(record)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CarbonRecord>, CarbonLedgerError> {
        let guard = self.records.lock().expect("ledger poisoned");
        Ok(guard.get(user_id).cloned().unwrap_or_default())
    }
}

/// In-memory plantation ledger.
#[derive(Default)]
pub struct InMemoryPlantationLedger {
    records: Mutex<Vec<PlantationRecord>>,
}

#[async_trait]
impl PlantationLedger for InMemoryPlantationLedger {
    async fn append(&self, record: &PlantationRecord) -> Result<(), PlantationLedgerError> {
        let mut guard = self.records.lock().expect("ledger poisoned");
        guard.push(record.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        id: &Uuid,
        status: PlantationStatus,
        external_id: Option<String>,
    ) -> Result<(), PlantationLedgerError> {
        let mut guard = self.records.lock().expect("ledger poisoned");
        let record = guard
            .iter_mut()
            .find(|record| record.id == *id)
            .ok_or(PlantationLedgerError::RecordNotFound { id: *id })?;
        record.status = status;
        record.external_id = external_id;
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PlantationRecord>, PlantationLedgerError> {
        let guard = self.records.lock().expect("ledger poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn list_pending(&self) -> Result<Vec<PlantationRecord>, PlantationLedgerError> {
        let guard = self.records.lock().expect("ledger poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.status == PlantationStatus::Pending)
            .cloned()
            .collect())
    }
}

/// In-memory learning-path store.
#[derive(Default)]
pub struct InMemoryLearningPaths {
    records: Mutex<Vec<LearningPathRecord>>,
}

impl InMemoryLearningPaths {
    /// Seed a path directly, bypassing any service.
    pub fn seed(&self, record: LearningPathRecord) {
        let mut guard = self.records.lock().expect("paths poisoned");
        guard.push(record);
    }
}

#[async_trait]
impl LearningPathRepository for InMemoryLearningPaths {
    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<LearningPathRecord>, LearningPathRepositoryError> {
        let guard = self.records.lock().expect("paths poisoned");
        Ok(guard.iter().find(|record| record.id == *id).cloned())
    }

    async fn save(&self, record: &LearningPathRecord) -> Result<(), LearningPathRepositoryError> {
        let mut guard = self.records.lock().expect("paths poisoned");
        match guard.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => guard.push(record.clone()),
        }
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<LearningPathRecord>, LearningPathRepositoryError> {
        let guard = self.records.lock().expect("paths poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn list_by_topic(
        &self,
        topic: &str,
    ) -> Result<Vec<LearningPathRecord>, LearningPathRepositoryError> {
        let guard = self.records.lock().expect("paths poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.topic == topic)
            .cloned()
            .collect())
    }
}

/// In-memory activity-date log.
#[derive(Default)]
pub struct InMemoryActivityLog {
    days: Mutex<HashMap<UserId, BTreeSet<NaiveDate>>>,
}

impl InMemoryActivityLog {
    /// Seed an active day directly, bypassing any service.
    pub fn seed(&self, user_id: &UserId, date: NaiveDate) {
        let mut guard = self.days.lock().expect("activity poisoned");
        guard.entry(user_id.clone()).or_default().insert(date);
    }
}

#[async_trait]
impl ActivityLog for InMemoryActivityLog {
    async fn record(&self, user_id: &UserId, date: NaiveDate) -> Result<(), ActivityLogError> {
        self.seed(user_id, date);
        Ok(())
    }

    async fn list_dates(&self, user_id: &UserId) -> Result<Vec<NaiveDate>, ActivityLogError> {
        let guard = self.days.lock().expect("activity poisoned");
        Ok(guard
            .get(user_id)
            .map(|days| days.iter().copied().collect())
            .unwrap_or_default())
    }
}

/// In-memory snapshot cache. TTLs are accepted but not enforced; tests
/// assert eviction, not expiry.
#[derive(Default)]
pub struct InMemoryDashboardCache {
    entries: Mutex<HashMap<String, Value>>,
}

impl InMemoryDashboardCache {
    /// Whether a value is currently cached under `key`.
    pub fn contains(&self, key: &CacheKey) -> bool {
        let guard = self.entries.lock().expect("cache poisoned");
        guard.contains_key(key.as_str())
    }
}

#[async_trait]
impl DashboardCache for InMemoryDashboardCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>, DashboardCacheError> {
        let guard = self.entries.lock().expect("cache poisoned");
        Ok(guard.get(key.as_str()).cloned())
    }

    async fn put(
        &self,
        key: &CacheKey,
        value: &Value,
        _ttl: Duration,
    ) -> Result<(), DashboardCacheError> {
        let mut guard = self.entries.lock().expect("cache poisoned");
        guard.insert(key.as_str().to_owned(), value.clone());
        Ok(())
    }

    async fn evict(&self, key: &CacheKey) -> Result<(), DashboardCacheError> {
        let mut guard = self.entries.lock().expect("cache poisoned");
        guard.remove(key.as_str());
        Ok(())
    }
}
