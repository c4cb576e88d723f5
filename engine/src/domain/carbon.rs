//! Carbon ledger records and the pure history aggregator.
//!
//! Records are append-only and owned by the [`crate::domain::ports::CarbonLedger`]
//! port; everything in this module is a pure function over slices of them.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::telemetry::{DeviceType, EnergySource};
use super::user::UserId;

/// kg CO₂ one tree absorbs per year. Canonical offset constant; the
/// inverse trees-per-kg factor seen elsewhere is intentionally not used.
pub const OFFSET_PER_TREE_KG_PER_YEAR: f64 = 21.77;

/// Days covered by the default history window.
const DEFAULT_HISTORY_DAYS: u64 = 30;

/// Number of trees whose annual absorption offsets `total_carbon_kg`.
///
/// # Examples
/// ```
/// use engine::domain::carbon::trees_needed;
///
/// assert_eq!(trees_needed(21.77), 1);
/// assert_eq!(trees_needed(21.78), 2);
/// assert_eq!(trees_needed(0.0), 0);
/// ```
pub fn trees_needed(total_carbon_kg: f64) -> u32 {
    let trees = (total_carbon_kg.max(0.0) / OFFSET_PER_TREE_KG_PER_YEAR).ceil();
    trees as u32
}

/// One appended ledger entry for a completed session.
///
/// `total_carbon` is the user's running total *including* this session
/// and is monotonically non-decreasing across a user's records in commit
/// order. Records are never mutated after append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonRecord {
    /// Owning user.
    pub user_id: UserId,
    /// Calendar day the session completed on.
    pub date: NaiveDate,
    /// This session's estimated CO₂ mass, kg.
    pub session_carbon: f64,
    /// Running total across all of the user's sessions, kg.
    pub total_carbon: f64,
    /// Trees required to offset `total_carbon`.
    pub trees_needed: u32,
    /// Device class reported for the session.
    pub device_type: DeviceType,
    /// Energy source reported for the session.
    pub energy_source: EnergySource,
    /// Append timestamp.
    pub recorded_at: DateTime<Utc>,
}

/// Fields the write path supplies; the ledger adapter derives the running
/// total and tree requirement atomically on append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCarbonSession {
    /// Owning user.
    pub user_id: UserId,
    /// Calendar day the session completed on.
    pub date: NaiveDate,
    /// This session's estimated CO₂ mass, kg.
    pub session_carbon: f64,
    /// Device class reported for the session.
    pub device_type: DeviceType,
    /// Energy source reported for the session.
    pub energy_source: EnergySource,
    /// Append timestamp.
    pub recorded_at: DateTime<Utc>,
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First day included.
    pub start: NaiveDate,
    /// Last day included.
    pub end: NaiveDate,
}

impl DateRange {
    /// The default history window: the last 30 days through `today`.
    pub fn default_window(today: NaiveDate) -> Self {
        Self {
            start: today
                .checked_sub_days(Days::new(DEFAULT_HISTORY_DAYS))
                .unwrap_or(NaiveDate::MIN),
            end: today,
        }
    }

    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Named reporting period ending today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// The last 7 days.
    Week,
    /// The last calendar month.
    Month,
    /// The last three calendar months.
    Quarter,
    /// The last calendar year.
    Year,
}

impl Period {
    /// Resolve the period into an inclusive range ending at `end`.
    pub fn range_ending(self, end: NaiveDate) -> DateRange {
        let start = match self {
            Self::Week => end.checked_sub_days(Days::new(7)),
            Self::Month => end.checked_sub_months(Months::new(1)),
            Self::Quarter => end.checked_sub_months(Months::new(3)),
            Self::Year => end.checked_sub_months(Months::new(12)),
        };
        DateRange {
            start: start.unwrap_or(NaiveDate::MIN),
            end,
        }
    }
}

/// One plotted point of the history series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonDataPoint {
    /// Session day.
    pub date: NaiveDate,
    /// Session CO₂ mass, kg.
    pub session_carbon: f64,
    /// Running total at this session, kg.
    pub total_carbon: f64,
}

/// Carbon summed per calendar day across the filtered range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCarbon {
    /// Calendar day.
    pub date: NaiveDate,
    /// Total session CO₂ recorded that day, kg.
    pub carbon: f64,
}

/// Summary statistics over the filtered history.
///
/// All fields are zero/`None` for an empty history; an empty window is
/// never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CarbonStatistics {
    /// Sum of session carbon over the window, kg.
    pub total_session_carbon: f64,
    /// Mean session carbon over the window, kg.
    pub average_session_carbon: f64,
    /// Largest single session in the window, kg.
    pub max_session_carbon: f64,
    /// Smallest single session in the window, kg.
    pub min_session_carbon: f64,
    /// Sessions inside the window.
    pub sessions: u32,
    /// Earliest session day in the window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_session: Option<NaiveDate>,
    /// Latest session day in the window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_session: Option<NaiveDate>,
}

/// Filtered history handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonHistoryReport {
    /// Owning user.
    pub user_id: UserId,
    /// Window the report covers.
    pub range: DateRange,
    /// Per-session points inside the window, in input order.
    pub data_points: Vec<CarbonDataPoint>,
    /// Carbon summed per calendar day, ascending.
    pub daily_totals: Vec<DailyCarbon>,
    /// Window statistics.
    pub statistics: CarbonStatistics,
}

/// All-time footprint summary feeding the dashboard and the offset rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CarbonFootprint {
    /// Cumulative session carbon across all records, kg.
    pub total_carbon: f64,
    /// Mean session carbon across all records, kg.
    pub average_session_carbon: f64,
    /// Total recorded sessions.
    pub sessions: u32,
    /// Trees required to offset `total_carbon`.
    pub trees_needed: u32,
}

/// Build the filtered history report for one user.
pub fn history(user_id: UserId, records: &[CarbonRecord], range: DateRange) -> CarbonHistoryReport {
    let data_points: Vec<CarbonDataPoint> = records
        .iter()
        .filter(|record| range.contains(record.date))
        .map(|record| CarbonDataPoint {
            date: record.date,
            session_carbon: record.session_carbon,
            total_carbon: record.total_carbon,
        })
        .collect();

    let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for point in &data_points {
        *per_day.entry(point.date).or_insert(0.0) += point.session_carbon;
    }
    let daily_totals = per_day
        .into_iter()
        .map(|(date, carbon)| DailyCarbon { date, carbon })
        .collect();

    CarbonHistoryReport {
        user_id,
        range,
        statistics: statistics(&data_points),
        data_points,
        daily_totals,
    }
}

/// Summarise a set of filtered points.
fn statistics(points: &[CarbonDataPoint]) -> CarbonStatistics {
    if points.is_empty() {
        return CarbonStatistics::default();
    }

    let total: f64 = points.iter().map(|p| p.session_carbon).sum();
    let sessions = points.len() as u32;
    let max = points
        .iter()
        .map(|p| p.session_carbon)
        .fold(f64::MIN, f64::max);
    let min = points
        .iter()
        .map(|p| p.session_carbon)
        .fold(f64::MAX, f64::min);

    CarbonStatistics {
        total_session_carbon: total,
        average_session_carbon: total / f64::from(sessions),
        max_session_carbon: max,
        min_session_carbon: min,
        sessions,
        first_session: points.iter().map(|p| p.date).min(),
        last_session: points.iter().map(|p| p.date).max(),
    }
}

/// Build the all-time footprint summary for one user.
pub fn footprint(records: &[CarbonRecord]) -> CarbonFootprint {
    if records.is_empty() {
        return CarbonFootprint::default();
    }

    let total: f64 = records.iter().map(|r| r.session_carbon).sum();
    let sessions = records.len() as u32;

    CarbonFootprint {
        total_carbon: total,
        average_session_carbon: total / f64::from(sessions),
        sessions,
        trees_needed: trees_needed(total),
    }
}
