//! Learning-path records and the pure progress aggregator.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Placeholder difficulty reported when a user has no paths yet.
pub const DEFAULT_DIFFICULTY: Difficulty = Difficulty::Beginner;
/// Placeholder topic reported when a user has no paths yet.
pub const DEFAULT_TOPIC: &str = "sustainability";

/// Difficulty tier of a learning path.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Entry-level content.
    Beginner,
    /// Intermediate content.
    Intermediate,
    /// Advanced content.
    Advanced,
}

impl Difficulty {
    /// Parse a client-reported label, case-insensitively.
    pub fn parse(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        };
        f.write_str(label)
    }
}

/// One learning path owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPathRecord {
    /// Path identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: UserId,
    /// Path title.
    pub title: String,
    /// Subject area.
    pub topic: String,
    /// Difficulty tier.
    pub difficulty: Difficulty,
    /// Completion percentage in `[0, 100]`.
    pub progress: f64,
    /// Estimated hours to complete the whole path.
    pub estimated_hours: f64,
    /// Set exactly once, when progress first reaches 100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// When the path was created for the user.
    pub generated_at: DateTime<Utc>,
}

impl LearningPathRecord {
    /// Whether the path has been completed. Derived from progress; there
    /// is no separately stored flag to drift out of sync.
    pub fn is_completed(&self) -> bool {
        self.progress >= 100.0
    }
}

/// Per-module completion pair.
///
/// No authoritative module-tracking source exists yet, so the engine
/// never populates this; the field stays on the wire for forward
/// compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProgress {
    /// Modules finished.
    pub modules_completed: u32,
    /// Modules in the path.
    pub total_modules: u32,
}

/// One path as shown on the progress report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathProgress {
    /// Path identifier.
    pub path_id: Uuid,
    /// Path title.
    pub title: String,
    /// Difficulty tier.
    pub difficulty: Difficulty,
    /// Progress rounded to a whole percentage.
    pub completion_percentage: u8,
    /// Module completion, when a tracking source exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules: Option<ModuleProgress>,
}

impl From<&LearningPathRecord> for PathProgress {
    fn from(record: &LearningPathRecord) -> Self {
        Self {
            path_id: record.id,
            title: record.title.clone(),
            difficulty: record.difficulty,
            completion_percentage: record.progress.round().clamp(0.0, 100.0) as u8,
            modules: None,
        }
    }
}

/// Aggregate statistics over a user's learning paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStats {
    /// Paths the user owns.
    pub total_paths: u32,
    /// Paths at 100% progress.
    pub completed_paths: u32,
    /// Paths strictly between 0% and 100%.
    pub in_progress_paths: u32,
    /// Mean progress across all paths.
    pub average_progress: f64,
    /// Estimated hours across all paths.
    pub total_estimated_hours: f64,
    /// Hours weighted by progress (Σ hours × progress / 100).
    pub completed_hours: f64,
    /// Path counts per difficulty tier.
    pub difficulty_distribution: BTreeMap<Difficulty, u32>,
    /// Most frequent difficulty; ties go to the first encountered.
    pub preferred_difficulty: Difficulty,
    /// Path counts per topic.
    pub topic_distribution: BTreeMap<String, u32>,
    /// Most frequent topic; ties go to the first encountered.
    pub preferred_topic: String,
}

impl Default for LearningStats {
    fn default() -> Self {
        Self {
            total_paths: 0,
            completed_paths: 0,
            in_progress_paths: 0,
            average_progress: 0.0,
            total_estimated_hours: 0.0,
            completed_hours: 0.0,
            difficulty_distribution: BTreeMap::new(),
            preferred_difficulty: DEFAULT_DIFFICULTY,
            topic_distribution: BTreeMap::new(),
            preferred_topic: DEFAULT_TOPIC.to_owned(),
        }
    }
}

/// Progress report handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningProgressReport {
    /// Owning user.
    pub user_id: UserId,
    /// Per-path progress, in input order.
    pub paths_progress: Vec<PathProgress>,
    /// Aggregate statistics.
    pub statistics: LearningStats,
}

/// Summarise a user's learning paths.
///
/// An empty input yields [`LearningStats::default`]: zero counts with the
/// documented placeholder preferences.
pub fn summarize(records: &[LearningPathRecord]) -> LearningStats {
    if records.is_empty() {
        return LearningStats::default();
    }

    let total_paths = records.len() as u32;
    let completed_paths = records.iter().filter(|r| r.is_completed()).count() as u32;
    let in_progress_paths = records
        .iter()
        .filter(|r| r.progress > 0.0 && !r.is_completed())
        .count() as u32;

    let average_progress =
        records.iter().map(|r| r.progress).sum::<f64>() / f64::from(total_paths);
    let total_estimated_hours: f64 = records.iter().map(|r| r.estimated_hours).sum();
    let completed_hours: f64 = records
        .iter()
        .map(|r| r.estimated_hours * (r.progress / 100.0))
        .sum();

    let mut difficulty_distribution = BTreeMap::new();
    let mut topic_distribution = BTreeMap::new();
    for record in records {
        *difficulty_distribution.entry(record.difficulty).or_insert(0) += 1;
        *topic_distribution
            .entry(record.topic.clone())
            .or_insert(0) += 1;
    }

    let preferred_difficulty =
        mode_first_encountered(records.iter().map(|r| r.difficulty)).unwrap_or(DEFAULT_DIFFICULTY);
    let preferred_topic = mode_first_encountered(records.iter().map(|r| r.topic.clone()))
        .unwrap_or_else(|| DEFAULT_TOPIC.to_owned());

    LearningStats {
        total_paths,
        completed_paths,
        in_progress_paths,
        average_progress,
        total_estimated_hours,
        completed_hours,
        difficulty_distribution,
        preferred_difficulty,
        topic_distribution,
        preferred_topic,
    }
}

/// Most frequent item; ties broken by first encounter in input order.
fn mode_first_encountered<T: PartialEq>(items: impl Iterator<Item = T>) -> Option<T> {
    let mut counts: Vec<(T, u32)> = Vec::new();
    for item in items {
        if let Some(entry) = counts.iter_mut().find(|(value, _)| *value == item) {
            entry.1 += 1;
        } else {
            counts.push((item, 1));
        }
    }

    let mut best: Option<(T, u32)> = None;
    for (value, count) in counts {
        match &best {
            // Strictly greater keeps the earliest encountered on ties.
            Some((_, best_count)) if count <= *best_count => {}
            _ => best = Some((value, count)),
        }
    }
    best.map(|(value, _)| value)
}
