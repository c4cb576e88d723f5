//! Tests for the dashboard orchestrator.

use std::sync::Arc;

use chrono::{DateTime, Days, TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;

use super::{DashboardPorts, DashboardService};
use crate::config::EngineConfig;
use crate::domain::ErrorCode;
use crate::domain::insights::RecommendationKind;
use crate::domain::learning::{Difficulty, LearningPathRecord};
use crate::domain::plantation::{PlantationRecord, PlantationStatus, carbon_offset_for};
use crate::domain::CarbonTrackingService;
use crate::domain::ports::{CacheKey, DashboardCache, PlantationLedger};
use crate::domain::telemetry::{DeviceType, EnergySource, SessionTelemetry};
use crate::domain::user::{UserId, UserProfile};
use crate::test_support::{
    FixtureClock, InMemoryActivityLog, InMemoryCarbonLedger, InMemoryDashboardCache,
    InMemoryLearningPaths, InMemoryPlantationLedger, InMemoryUserDirectory,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 10, 30, 0)
        .single()
        .expect("valid timestamp")
}

struct Fixture {
    users: Arc<InMemoryUserDirectory>,
    carbon: Arc<InMemoryCarbonLedger>,
    plantations: Arc<InMemoryPlantationLedger>,
    learning: Arc<InMemoryLearningPaths>,
    activity: Arc<InMemoryActivityLog>,
    cache: Arc<InMemoryDashboardCache>,
    service: DashboardService,
    user_id: UserId,
}

fn fixture() -> Fixture {
    let users = Arc::new(InMemoryUserDirectory::default());
    let carbon = Arc::new(InMemoryCarbonLedger::default());
    let plantations = Arc::new(InMemoryPlantationLedger::default());
    let learning = Arc::new(InMemoryLearningPaths::default());
    let activity = Arc::new(InMemoryActivityLog::default());
    let cache = Arc::new(InMemoryDashboardCache::default());

    let user_id = UserId::random();
    users.insert(UserProfile {
        id: user_id.clone(),
        display_name: "Robin".to_owned(),
        email: None,
    });

    let ports = DashboardPorts {
        users: users.clone(),
        carbon: carbon.clone(),
        plantations: plantations.clone(),
        learning: learning.clone(),
        activity: activity.clone(),
        cache: cache.clone(),
        clock: Arc::new(FixtureClock::at(now())),
    };
    let service = DashboardService::new(ports, EngineConfig::default());

    Fixture {
        users,
        carbon,
        plantations,
        learning,
        activity,
        cache,
        service,
        user_id,
    }
}

fn seeded_path(user_id: &UserId, topic: &str, progress: f64) -> LearningPathRecord {
    LearningPathRecord {
        id: Uuid::new_v4(),
        user_id: user_id.clone(),
        title: format!("Intro to {topic}"),
        topic: topic.to_owned(),
        difficulty: Difficulty::Beginner,
        progress,
        estimated_hours: 8.0,
        completed_at: None,
        generated_at: now(),
    }
}

async fn plant(fixture: &Fixture, trees: u32) {
    let record = PlantationRecord {
        id: Uuid::new_v4(),
        user_id: fixture.user_id.clone(),
        trees_planted: trees,
        project: "amazon".to_owned(),
        location: "Amazon Rainforest, Brazil".to_owned(),
        cost: f64::from(trees) * 0.10,
        carbon_offset: carbon_offset_for(trees),
        planted_at: now(),
        status: PlantationStatus::Confirmed,
        external_id: Some("EXT-1".to_owned()),
    };
    fixture
        .plantations
        .append(&record)
        .await
        .expect("seed plantation");
}

#[tokio::test]
async fn unknown_users_get_a_not_found_dashboard() {
    let fixture = fixture();
    let error = fixture
        .service
        .dashboard(&UserId::random())
        .await
        .expect_err("unknown user rejected");

    assert_eq!(error.code(), ErrorCode::NotFound);
    let details = error.details().expect("details attached");
    assert_eq!(details["code"], "user_not_found");
}

#[tokio::test]
async fn brand_new_users_score_only_the_carbon_default_term() {
    let fixture = fixture();
    let snapshot = fixture
        .service
        .dashboard(&fixture.user_id)
        .await
        .expect("dashboard computed");

    assert_eq!(snapshot.eco_score, 30);
    assert_eq!(snapshot.learning_stats.total_paths, 0);
    assert_eq!(snapshot.streak_days, 0);
    assert!(snapshot.badges.is_empty());
    // Rule 1 (no completed path) then rule 5 (no streak).
    let kinds: Vec<RecommendationKind> =
        snapshot.recommendations.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![RecommendationKind::Learning, RecommendationKind::Engagement]
    );
    assert_eq!(snapshot.generated_at, now());
}

#[tokio::test]
async fn dashboards_compose_all_three_ledgers_and_the_activity_log() {
    let fixture = fixture();

    // One heavy day of sessions: 2 × 11 kg => 22 kg total, 2 trees.
    let carbon_service = CarbonTrackingService::new(
        fixture.users.clone(),
        fixture.carbon.clone(),
        fixture.activity.clone(),
        fixture.cache.clone(),
        Arc::new(FixtureClock::at(now())),
    );
    let heavy = SessionTelemetry {
        duration_hours: 220.0,
        data_used_mb: 0.0,
        api_requests: 0,
        device_type: DeviceType::Laptop,
        energy_source: EnergySource::Fossil,
    };
    for _ in 0..2 {
        carbon_service
            .record_session(&fixture.user_id, &heavy)
            .await
            .expect("session recorded");
    }

    plant(&fixture, 1).await;

    fixture
        .learning
        .seed(seeded_path(&fixture.user_id, "solar", 100.0));
    fixture
        .learning
        .seed(seeded_path(&fixture.user_id, "wind", 30.0));

    // Three consecutive active days ending today.
    let today = now().date_naive();
    for offset in 0..3 {
        fixture.activity.seed(
            &fixture.user_id,
            today.checked_sub_days(Days::new(offset)).expect("valid date"),
        );
    }

    let snapshot = fixture
        .service
        .dashboard(&fixture.user_id)
        .await
        .expect("dashboard computed");

    assert_eq!(snapshot.carbon_stats.sessions, 2);
    assert_eq!(snapshot.carbon_stats.trees_needed, 2);
    assert_eq!(snapshot.plantation_stats.total_trees, 1);
    assert_eq!(snapshot.learning_stats.completed_paths, 1);
    assert_eq!(snapshot.streak_days, 3);
    assert!(snapshot.badges.iter().any(|b| b.id == "first_steps"));

    // Offset gap of one tree fires the carbon rule first.
    assert_eq!(snapshot.recommendations[0].kind, RecommendationKind::Carbon);
    assert!(snapshot.recommendations[0].description.contains("1 more tree"));
}

#[tokio::test]
async fn dashboards_are_idempotent_without_intervening_writes() {
    let fixture = fixture();
    fixture
        .learning
        .seed(seeded_path(&fixture.user_id, "solar", 40.0));

    let first = fixture
        .service
        .dashboard(&fixture.user_id)
        .await
        .expect("first dashboard");
    let second = fixture
        .service
        .dashboard(&fixture.user_id)
        .await
        .expect("second dashboard");

    assert_eq!(first, second);
}

#[tokio::test]
async fn computed_snapshots_are_cached_under_the_user_key() {
    let fixture = fixture();
    let key = CacheKey::dashboard(&fixture.user_id);
    assert!(!fixture.cache.contains(&key));

    fixture
        .service
        .dashboard(&fixture.user_id)
        .await
        .expect("dashboard computed");

    assert!(fixture.cache.contains(&key));
}

#[tokio::test]
async fn a_cached_snapshot_is_served_without_recomputation() {
    let fixture = fixture();

    let first = fixture
        .service
        .dashboard(&fixture.user_id)
        .await
        .expect("dashboard computed");

    // A write that bypasses the services leaves the cache stale, so the
    // cached snapshot keeps being served until something evicts it.
    fixture
        .learning
        .seed(seeded_path(&fixture.user_id, "solar", 100.0));
    let cached = fixture
        .service
        .dashboard(&fixture.user_id)
        .await
        .expect("dashboard served");
    assert_eq!(cached, first);

    let key = CacheKey::dashboard(&fixture.user_id);
    fixture.cache.evict(&key).await.expect("evict");
    let recomputed = fixture
        .service
        .dashboard(&fixture.user_id)
        .await
        .expect("dashboard recomputed");
    assert_eq!(recomputed.learning_stats.total_paths, 1);
}

#[tokio::test]
async fn unreadable_cache_entries_fall_back_to_recomputation() {
    let fixture = fixture();
    let key = CacheKey::dashboard(&fixture.user_id);

    fixture
        .cache
        .put(&key, &json!({"not": "a snapshot"}), std::time::Duration::from_secs(60))
        .await
        .expect("seed garbage");

    let snapshot = fixture
        .service
        .dashboard(&fixture.user_id)
        .await
        .expect("dashboard recomputed");
    assert_eq!(snapshot.user_id, fixture.user_id);
}
