//! Engagement insight engines: recommendations, badges, and the
//! eco-score.
//!
//! Both rule engines are fixed arrays of independent (predicate,
//! producer) pairs over the same [`RuleContext`]; evaluation order is the
//! declaration order and nothing deduplicates or re-ranks the output.

mod badges;
mod recommendation;
mod score;

pub use badges::{Badge, BadgeTier, badges};
pub use recommendation::{Priority, Recommendation, RecommendationKind, recommend};
pub use score::eco_score;

use super::carbon::CarbonFootprint;
use super::learning::LearningStats;
use super::plantation::PlantationSummary;

/// Aggregate inputs the rule engines evaluate over.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Learning-path aggregate.
    pub learning: &'a LearningStats,
    /// All-time carbon footprint aggregate.
    pub carbon: &'a CarbonFootprint,
    /// Plantation aggregate.
    pub plantation: &'a PlantationSummary,
    /// Consecutive active days ending today.
    pub streak_days: u32,
}
