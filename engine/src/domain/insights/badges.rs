//! Threshold badge rules.

use serde::{Deserialize, Serialize};

use super::RuleContext;

/// Badge tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTier {
    /// Entry achievement.
    Bronze,
    /// Sustained achievement.
    Silver,
    /// Exceptional achievement.
    Gold,
}

/// One earned achievement.
///
/// The returned collection has set semantics: identifiers are unique and
/// no ordering is guaranteed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// What earned it.
    pub description: String,
    /// Tier.
    pub tier: BadgeTier,
}

struct Rule {
    applies: fn(&RuleContext<'_>) -> bool,
    id: &'static str,
    name: &'static str,
    description: &'static str,
    tier: BadgeTier,
}

impl Rule {
    fn build(&self) -> Badge {
        Badge {
            id: self.id.to_owned(),
            name: self.name.to_owned(),
            description: self.description.to_owned(),
            tier: self.tier,
        }
    }
}

/// Independent threshold rules; every matching rule fires.
const RULES: [Rule; 9] = [
    Rule {
        applies: |ctx| ctx.learning.completed_paths >= 1,
        id: "first_steps",
        name: "First Steps",
        description: "Completed a first learning path",
        tier: BadgeTier::Bronze,
    },
    Rule {
        applies: |ctx| ctx.learning.completed_paths >= 5,
        id: "fast_learner",
        name: "Fast Learner",
        description: "Completed 5 learning paths",
        tier: BadgeTier::Silver,
    },
    Rule {
        applies: |ctx| ctx.learning.completed_paths >= 10,
        id: "knowledge_master",
        name: "Knowledge Master",
        description: "Completed 10 learning paths",
        tier: BadgeTier::Gold,
    },
    Rule {
        applies: |ctx| ctx.plantation.total_trees >= 10,
        id: "tree_planter",
        name: "Tree Planter",
        description: "Planted 10 trees",
        tier: BadgeTier::Bronze,
    },
    Rule {
        applies: |ctx| ctx.plantation.total_carbon_offset >= 100.0,
        id: "carbon_neutral",
        name: "Carbon Neutral",
        description: "Offset 100 kg of CO2",
        tier: BadgeTier::Silver,
    },
    Rule {
        applies: |ctx| ctx.plantation.total_carbon_offset >= 500.0,
        id: "climate_hero",
        name: "Climate Hero",
        description: "Offset 500 kg of CO2",
        tier: BadgeTier::Gold,
    },
    Rule {
        applies: |ctx| ctx.streak_days >= 7,
        id: "weekly_streak",
        name: "Weekly Regular",
        description: "7 consecutive days of activity",
        tier: BadgeTier::Bronze,
    },
    Rule {
        applies: |ctx| ctx.streak_days >= 30,
        id: "monthly_streak",
        name: "Monthly Devotee",
        description: "30 consecutive days of activity",
        tier: BadgeTier::Silver,
    },
    Rule {
        applies: |ctx| {
            ctx.learning.completed_paths >= 5
                && ctx.plantation.total_trees >= 10
                && ctx.plantation.total_carbon_offset >= 100.0
        },
        id: "eco_warrior",
        name: "Eco Warrior",
        description: "Sustained learning backed by real climate action",
        tier: BadgeTier::Gold,
    },
];

/// Evaluate every threshold rule; all matching rules fire.
pub fn badges(ctx: &RuleContext<'_>) -> Vec<Badge> {
    RULES
        .iter()
        .filter(|rule| (rule.applies)(ctx))
        .map(Rule::build)
        .collect()
}
