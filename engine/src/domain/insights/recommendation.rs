//! Ordered recommendation rules.

use serde::{Deserialize, Serialize};

use super::RuleContext;

/// Action urgency attached to a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Act now.
    High,
    /// Act soon.
    Medium,
    /// Nice to have.
    Low,
}

/// Category a recommendation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    /// Start or resume learning content.
    Learning,
    /// Offset recorded carbon.
    Carbon,
    /// Push stalled paths forward.
    Progress,
    /// Broaden topic coverage.
    Diversity,
    /// Keep the daily habit alive.
    Engagement,
}

/// One suggested next action for the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Category.
    pub kind: RecommendationKind,
    /// Short headline.
    pub title: String,
    /// One-sentence rationale.
    pub description: String,
    /// Action urgency.
    pub priority: Priority,
    /// Frontend route the action links to.
    pub action: String,
}

struct Rule {
    applies: fn(&RuleContext<'_>) -> bool,
    emit: fn(&RuleContext<'_>) -> Recommendation,
}

/// The canonical rule set. Output order is exactly this declaration
/// order; each rule fires independently of the others.
const RULES: [Rule; 5] = [
    Rule {
        applies: |ctx| ctx.learning.completed_paths == 0,
        emit: |_| Recommendation {
            kind: RecommendationKind::Learning,
            title: "Start your first learning path".to_owned(),
            description: "Discover the introductory sustainability path".to_owned(),
            priority: Priority::High,
            action: "/learning/paths/beginner-sustainability".to_owned(),
        },
    },
    Rule {
        applies: |ctx| {
            ctx.carbon.total_carbon > 0.0
                && ctx.plantation.total_trees < ctx.carbon.trees_needed
        },
        emit: |ctx| {
            let gap = ctx.carbon.trees_needed - ctx.plantation.total_trees;
            Recommendation {
                kind: RecommendationKind::Carbon,
                title: "Offset your carbon footprint".to_owned(),
                description: format!("Plant {gap} more trees to become carbon neutral"),
                priority: Priority::High,
                action: "/carbon/offset".to_owned(),
            }
        },
    },
    Rule {
        applies: |ctx| {
            ctx.learning.average_progress > 0.0
                && ctx.learning.average_progress < 50.0
                && ctx.learning.in_progress_paths > 0
        },
        emit: |ctx| Recommendation {
            kind: RecommendationKind::Progress,
            title: "Continue your paths in progress".to_owned(),
            description: format!(
                "You are at {:.1}% average progress across {} active paths",
                ctx.learning.average_progress, ctx.learning.in_progress_paths
            ),
            priority: Priority::Medium,
            action: "/learning/dashboard".to_owned(),
        },
    },
    Rule {
        applies: |ctx| {
            ctx.learning.completed_paths >= 3 && ctx.learning.topic_distribution.len() < 2
        },
        emit: |_| Recommendation {
            kind: RecommendationKind::Diversity,
            title: "Explore new topics".to_owned(),
            description: "Broaden your knowledge with other sustainability themes".to_owned(),
            priority: Priority::Low,
            action: "/learning/topics".to_owned(),
        },
    },
    Rule {
        applies: |ctx| ctx.streak_days < 3,
        emit: |_| Recommendation {
            kind: RecommendationKind::Engagement,
            title: "Keep your streak going".to_owned(),
            description: "Come back tomorrow to keep learning".to_owned(),
            priority: Priority::Medium,
            action: "/daily-challenge".to_owned(),
        },
    },
];

/// Evaluate every rule in declaration order.
pub fn recommend(ctx: &RuleContext<'_>) -> Vec<Recommendation> {
    RULES
        .iter()
        .filter(|rule| (rule.applies)(ctx))
        .map(|rule| (rule.emit)(ctx))
        .collect()
}
