//! Bounded eco-score composer.

use crate::domain::carbon::CarbonFootprint;
use crate::domain::learning::LearningStats;
use crate::domain::plantation::PlantationSummary;

/// Average session carbon (kg) at or above which the carbon term scores
/// zero.
const WORST_AVERAGE_SESSION_KG: f64 = 0.2;

/// Compose the bounded engagement score from the three aggregates.
///
/// The three terms cap at 40 (learning), 30 (carbon efficiency), and 30
/// (offset progress); the rounded sum is clamped into `[0, 100]`.
///
/// # Examples
/// ```
/// use engine::domain::{
///     carbon::CarbonFootprint, insights::eco_score, learning::LearningStats,
///     plantation::PlantationSummary,
/// };
///
/// // A brand-new user scores only the carbon default term.
/// let score = eco_score(
///     &LearningStats::default(),
///     &CarbonFootprint::default(),
///     &PlantationSummary::default(),
/// );
/// assert_eq!(score, 30);
/// ```
pub fn eco_score(
    learning: &LearningStats,
    carbon: &CarbonFootprint,
    plantation: &PlantationSummary,
) -> u8 {
    let learning_score = f64::from((learning.completed_paths * 4).min(20))
        + (learning.average_progress * 0.2).min(20.0);

    let carbon_efficiency =
        1.0 - (carbon.average_session_carbon / WORST_AVERAGE_SESSION_KG).min(1.0);
    let carbon_score = carbon_efficiency * 30.0;

    let plantation_score = (f64::from(plantation.total_trees)
        / f64::from(carbon.trees_needed.max(1))
        * 30.0)
        .min(30.0);

    let total = learning_score + carbon_score + plantation_score;
    total.round().clamp(0.0, 100.0) as u8
}
