//! Plantation ledger records and the pure evolution/summary aggregators.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::carbon::OFFSET_PER_TREE_KG_PER_YEAR;
use super::user::UserId;

/// kg of oxygen one tree produces per year.
const OXYGEN_PER_TREE_KG: f64 = 118.0;
/// Litres of water one tree filters per year.
const WATER_PER_TREE_LITRES: f64 = 3785.0;
/// kg CO₂ per km driven by an average car.
const CAR_KG_PER_KM: f64 = 0.12;
/// kg CO₂ per short-haul flight.
const SHORT_FLIGHT_KG: f64 = 200.0;

/// Confirmation state of a plantation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlantationStatus {
    /// Written locally; not yet confirmed by the planting provider.
    Pending,
    /// Confirmed by the planting provider.
    Confirmed,
}

/// One recorded plant action.
///
/// Records are append-only; the only permitted mutation is the
/// `Pending` → `Confirmed` status transition driven by the provider sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantationRecord {
    /// Record identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: UserId,
    /// Trees planted by this action; always positive.
    pub trees_planted: u32,
    /// Reforestation project the donation went to.
    pub project: String,
    /// Human-readable location derived from the project.
    pub location: String,
    /// Donation cost in the host currency.
    pub cost: f64,
    /// Annual CO₂ offset of the planted trees, kg.
    pub carbon_offset: f64,
    /// When the action was recorded.
    pub planted_at: DateTime<Utc>,
    /// Confirmation state.
    pub status: PlantationStatus,
    /// Provider-side identifier, once confirmed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

/// Map a project name to the region it plants in.
///
/// Unknown projects fall back to the multi-region programme.
pub fn project_location(project: &str) -> &'static str {
    match project.to_ascii_lowercase().as_str() {
        "amazon" => "Amazon Rainforest, Brazil",
        "africa" => "Kenya, Africa",
        "indonesia" => "Borneo, Indonesia",
        "europe" => "France, Europe",
        _ => "Global Reforestation Project",
    }
}

/// Annual CO₂ offset of `trees` trees, kg.
pub fn carbon_offset_for(trees: u32) -> f64 {
    f64::from(trees) * OFFSET_PER_TREE_KG_PER_YEAR
}

/// One point of the cumulative evolution series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantationPoint {
    /// When the action was recorded.
    pub planted_at: DateTime<Utc>,
    /// Trees planted by this action.
    pub trees_planted: u32,
    /// Annual CO₂ offset of this action, kg.
    pub carbon_offset: f64,
    /// Running tree count from the first plotted action.
    pub cumulative_trees: u32,
}

/// Summary statistics over a user's plantations.
///
/// Zeroed for an empty ledger; never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlantationSummary {
    /// Recorded plant actions.
    pub total_plantations: u32,
    /// Total trees across all actions.
    pub total_trees: u32,
    /// Total annual CO₂ offset, kg, rounded to 2 decimals.
    pub total_carbon_offset: f64,
    /// Total donation cost, rounded to 2 decimals.
    pub total_cost: f64,
    /// Tree counts grouped by project.
    pub trees_by_project: BTreeMap<String, u32>,
    /// Earliest recorded action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_plantation: Option<DateTime<Utc>>,
    /// Latest recorded action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_plantation: Option<DateTime<Utc>>,
}

/// Evolution series plus summary, handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantationReport {
    /// Owning user.
    pub user_id: UserId,
    /// Cumulative series in ascending `planted_at` order.
    pub evolution: Vec<PlantationPoint>,
    /// Summary over the same records.
    pub statistics: PlantationSummary,
}

/// Estimated environmental impact of a number of planted trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalImpact {
    /// Trees the estimate covers.
    pub trees_planted: u32,
    /// Annual CO₂ absorbed, kg.
    pub co2_absorbed_kg: f64,
    /// Annual oxygen produced, kg.
    pub oxygen_produced_kg: f64,
    /// Annual water filtered, litres.
    pub water_filtered_litres: f64,
    /// Car kilometres with the same CO₂ cost.
    pub equivalent_car_km: f64,
    /// Short-haul flights with the same CO₂ cost.
    pub equivalent_short_flights: f64,
}

/// Build the cumulative evolution series in ascending `planted_at` order.
///
/// # Examples
/// Plantings of 3, 5 and 2 trees accumulate to `[3, 8, 10]`.
pub fn evolution(records: &[PlantationRecord]) -> Vec<PlantationPoint> {
    let mut ordered: Vec<&PlantationRecord> = records.iter().collect();
    ordered.sort_by_key(|record| record.planted_at);

    let mut cumulative = 0u32;
    ordered
        .into_iter()
        .map(|record| {
            cumulative += record.trees_planted;
            PlantationPoint {
                planted_at: record.planted_at,
                trees_planted: record.trees_planted,
                carbon_offset: record.carbon_offset,
                cumulative_trees: cumulative,
            }
        })
        .collect()
}

/// Summarise a user's plantations; input order does not matter.
pub fn summarize(records: &[PlantationRecord]) -> PlantationSummary {
    if records.is_empty() {
        return PlantationSummary::default();
    }

    let total_trees = records.iter().map(|r| r.trees_planted).sum();
    let total_offset: f64 = records.iter().map(|r| r.carbon_offset).sum();
    let total_cost: f64 = records.iter().map(|r| r.cost).sum();

    let mut trees_by_project: BTreeMap<String, u32> = BTreeMap::new();
    for record in records {
        *trees_by_project.entry(record.project.clone()).or_insert(0) += record.trees_planted;
    }

    PlantationSummary {
        total_plantations: records.len() as u32,
        total_trees,
        total_carbon_offset: round_to_cents(total_offset),
        total_cost: round_to_cents(total_cost),
        trees_by_project,
        first_plantation: records.iter().map(|r| r.planted_at).min(),
        last_plantation: records.iter().map(|r| r.planted_at).max(),
    }
}

/// Estimate the environmental impact of planting `trees` trees.
pub fn environmental_impact(trees: u32) -> EnvironmentalImpact {
    let co2 = carbon_offset_for(trees);
    EnvironmentalImpact {
        trees_planted: trees,
        co2_absorbed_kg: co2,
        oxygen_produced_kg: f64::from(trees) * OXYGEN_PER_TREE_KG,
        water_filtered_litres: f64::from(trees) * WATER_PER_TREE_LITRES,
        equivalent_car_km: co2 / CAR_KG_PER_KM,
        equivalent_short_flights: co2 / SHORT_FLIGHT_KG,
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn planted_at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn record(day: u32, trees: u32, project: &str) -> PlantationRecord {
        PlantationRecord {
            id: Uuid::new_v4(),
            user_id: UserId::random(),
            trees_planted: trees,
            project: project.to_owned(),
            location: project_location(project).to_owned(),
            cost: f64::from(trees) * 0.10,
            carbon_offset: carbon_offset_for(trees),
            planted_at: planted_at(day),
            status: PlantationStatus::Pending,
            external_id: None,
        }
    }

    #[test]
    fn evolution_accumulates_in_chronological_order() {
        // Deliberately unsorted input.
        let records = vec![
            record(5, 5, "amazon"),
            record(1, 3, "amazon"),
            record(9, 2, "africa"),
        ];
        let series = evolution(&records);
        let cumulative: Vec<u32> = series.iter().map(|p| p.cumulative_trees).collect();
        assert_eq!(cumulative, vec![3, 8, 10]);
        assert_eq!(series[0].planted_at, planted_at(1));
    }

    #[test]
    fn summary_groups_trees_by_project() {
        let records = vec![
            record(1, 3, "amazon"),
            record(2, 5, "amazon"),
            record(3, 2, "africa"),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.total_plantations, 3);
        assert_eq!(summary.total_trees, 10);
        assert_eq!(summary.trees_by_project.get("amazon"), Some(&8));
        assert_eq!(summary.trees_by_project.get("africa"), Some(&2));
        assert_eq!(summary.first_plantation, Some(planted_at(1)));
        assert_eq!(summary.last_plantation, Some(planted_at(3)));
        // 10 trees * 21.77 = 217.7 exactly.
        assert!((summary.total_carbon_offset - 217.7).abs() < 1e-9);
        assert!((summary.total_cost - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_ledger_summarises_to_zeroes() {
        assert_eq!(summarize(&[]), PlantationSummary::default());
        assert!(evolution(&[]).is_empty());
    }

    #[test]
    fn known_projects_map_to_their_regions() {
        assert_eq!(project_location("Amazon"), "Amazon Rainforest, Brazil");
        assert_eq!(project_location("backyard"), "Global Reforestation Project");
    }

    #[test]
    fn impact_estimates_scale_linearly_with_trees() {
        let impact = environmental_impact(10);
        assert!((impact.co2_absorbed_kg - 217.7).abs() < 1e-9);
        assert!((impact.oxygen_produced_kg - 1180.0).abs() < 1e-9);
        assert!((impact.water_filtered_litres - 37_850.0).abs() < 1e-9);
        assert!((impact.equivalent_car_km - 217.7 / 0.12).abs() < 1e-6);
        assert!((impact.equivalent_short_flights - 1.0885).abs() < 1e-9);
    }
}
