//! Tests for the plantation service.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use super::{PlantationService, SyncReport};
use crate::config::EngineConfig;
use crate::domain::ErrorCode;
use crate::domain::plantation::{PlantationRecord, PlantationStatus, carbon_offset_for};
use crate::domain::ports::{
    MockActivityLog, MockDashboardCache, MockPlantationLedger, MockPlantingProvider,
    MockUserDirectory, PlantingProvider, PlantingProviderError,
};
use crate::domain::user::{UserId, UserProfile};
use crate::test_support::FixtureClock;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 10, 30, 0)
        .single()
        .expect("valid timestamp")
}

fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock::at(now()))
}

fn known_user(user_id: &UserId) -> MockUserDirectory {
    let profile = UserProfile {
        id: user_id.clone(),
        display_name: "Robin".to_owned(),
        email: None,
    };
    let mut users = MockUserDirectory::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(profile)));
    users
}

fn quiet_activity() -> MockActivityLog {
    let mut activity = MockActivityLog::new();
    activity.expect_record().returning(|_, _| Ok(()));
    activity
}

fn quiet_cache() -> MockDashboardCache {
    let mut cache = MockDashboardCache::new();
    cache.expect_evict().returning(|_| Ok(()));
    cache
}

fn service(
    users: MockUserDirectory,
    ledger: MockPlantationLedger,
    activity: MockActivityLog,
    cache: MockDashboardCache,
    provider: Option<Arc<dyn PlantingProvider>>,
) -> PlantationService<MockUserDirectory, MockPlantationLedger, MockActivityLog, MockDashboardCache>
{
    PlantationService::new(
        Arc::new(users),
        Arc::new(ledger),
        Arc::new(activity),
        Arc::new(cache),
        provider,
        fixed_clock(),
        EngineConfig::default(),
    )
}

#[tokio::test]
async fn plant_trees_writes_a_pending_record_when_no_provider_is_configured() {
    let user_id = UserId::random();
    let mut ledger = MockPlantationLedger::new();
    ledger
        .expect_append()
        .withf(|record| record.status == PlantationStatus::Pending && record.external_id.is_none())
        .times(1)
        .returning(|_| Ok(()));

    let record = service(
        known_user(&user_id),
        ledger,
        quiet_activity(),
        quiet_cache(),
        None,
    )
    .plant_trees(&user_id, 5, "amazon")
    .await
    .expect("plantation recorded");

    assert_eq!(record.trees_planted, 5);
    assert_eq!(record.status, PlantationStatus::Pending);
    assert_eq!(record.location, "Amazon Rainforest, Brazil");
    assert!((record.cost - 0.5).abs() < 1e-9);
    assert!((record.carbon_offset - carbon_offset_for(5)).abs() < 1e-9);
}

#[tokio::test]
async fn a_configured_provider_confirms_the_fresh_record() {
    let user_id = UserId::random();
    let mut ledger = MockPlantationLedger::new();
    ledger.expect_append().times(1).returning(|_| Ok(()));
    ledger
        .expect_update_status()
        .withf(|_, status, external_id| {
            *status == PlantationStatus::Confirmed && external_id.as_deref() == Some("EXT-42")
        })
        .times(1)
        .returning(|_, _, _| Ok(()));

    let mut provider = MockPlantingProvider::new();
    provider
        .expect_confirm_planting()
        .times(1)
        .returning(|_, _, _| Ok("EXT-42".to_owned()));

    let record = service(
        known_user(&user_id),
        ledger,
        quiet_activity(),
        quiet_cache(),
        Some(Arc::new(provider)),
    )
    .plant_trees(&user_id, 3, "africa")
    .await
    .expect("plantation recorded");

    assert_eq!(record.status, PlantationStatus::Confirmed);
    assert_eq!(record.external_id.as_deref(), Some("EXT-42"));
}

#[tokio::test]
async fn provider_failure_leaves_the_record_pending_and_is_not_surfaced() {
    let user_id = UserId::random();
    let mut ledger = MockPlantationLedger::new();
    ledger.expect_append().times(1).returning(|_| Ok(()));
    // No update_status expectation: confirmation never reached it.

    let mut provider = MockPlantingProvider::new();
    provider
        .expect_confirm_planting()
        .returning(|_, _, _| Err(PlantingProviderError::unavailable("timeout")));

    let record = service(
        known_user(&user_id),
        ledger,
        quiet_activity(),
        quiet_cache(),
        Some(Arc::new(provider)),
    )
    .plant_trees(&user_id, 2, "indonesia")
    .await
    .expect("write survives provider failure");

    assert_eq!(record.status, PlantationStatus::Pending);
    assert!(record.external_id.is_none());
}

#[tokio::test]
async fn zero_trees_are_rejected_before_any_collaborator_call() {
    let user_id = UserId::random();
    let error = service(
        MockUserDirectory::new(),
        MockPlantationLedger::new(),
        MockActivityLog::new(),
        MockDashboardCache::new(),
        None,
    )
    .plant_trees(&user_id, 0, "amazon")
    .await
    .expect_err("zero trees rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

fn pending_record(user_id: &UserId, trees: u32) -> PlantationRecord {
    PlantationRecord {
        id: Uuid::new_v4(),
        user_id: user_id.clone(),
        trees_planted: trees,
        project: "amazon".to_owned(),
        location: "Amazon Rainforest, Brazil".to_owned(),
        cost: f64::from(trees) * 0.10,
        carbon_offset: carbon_offset_for(trees),
        planted_at: now(),
        status: PlantationStatus::Pending,
        external_id: None,
    }
}

#[tokio::test]
async fn sync_pending_retries_each_record_independently() {
    let user_id = UserId::random();
    let records = vec![
        pending_record(&user_id, 1),
        pending_record(&user_id, 2),
        pending_record(&user_id, 3),
    ];

    let mut ledger = MockPlantationLedger::new();
    ledger.expect_list_pending().return_once(move || Ok(records));
    // Only the two successful confirmations reach update_status.
    ledger
        .expect_update_status()
        .times(2)
        .returning(|_, _, _| Ok(()));

    // The middle record's confirmation fails; the others succeed.
    let mut provider = MockPlantingProvider::new();
    provider
        .expect_confirm_planting()
        .returning(|trees, _, _| match trees {
            2 => Err(PlantingProviderError::rejected("out of stock")),
            _ => Ok(format!("EXT-{trees}")),
        });

    let report = service(
        MockUserDirectory::new(),
        ledger,
        MockActivityLog::new(),
        quiet_cache(),
        Some(Arc::new(provider)),
    )
    .sync_pending()
    .await
    .expect("sync pass runs");

    assert_eq!(
        report,
        SyncReport {
            examined: 3,
            confirmed: 2,
        }
    );
}

#[tokio::test]
async fn sync_pending_is_a_noop_without_a_provider() {
    // No ledger expectations: the disabled state must not touch it.
    let report = service(
        MockUserDirectory::new(),
        MockPlantationLedger::new(),
        MockActivityLog::new(),
        MockDashboardCache::new(),
        None,
    )
    .sync_pending()
    .await
    .expect("disabled sync pass");

    assert_eq!(report, SyncReport::default());
}

#[tokio::test]
async fn report_windows_the_evolution_but_not_the_summary() {
    let user_id = UserId::random();
    let mut old = pending_record(&user_id, 4);
    old.planted_at = Utc
        .with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    let recent = pending_record(&user_id, 6);

    let mut ledger = MockPlantationLedger::new();
    let records = vec![old, recent];
    ledger
        .expect_list_for_user()
        .return_once(move |_| Ok(records));

    let report = service(
        MockUserDirectory::new(),
        ledger,
        MockActivityLog::new(),
        MockDashboardCache::new(),
        None,
    )
    .report(&user_id, None)
    .await
    .expect("report computed");

    // Default window is 12 months: only the recent record plots.
    assert_eq!(report.evolution.len(), 1);
    assert_eq!(report.evolution[0].cumulative_trees, 6);
    // The summary still covers the whole ledger.
    assert_eq!(report.statistics.total_trees, 10);
}
