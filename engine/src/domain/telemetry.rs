//! Session telemetry and the carbon footprint calculator.
//!
//! The calculator is a pure function from one session's telemetry to an
//! estimated CO₂ mass in kilograms. Weighting factors follow published
//! streaming-equivalent figures; adjust them here and nowhere else.

use std::fmt;

use serde::{Deserialize, Serialize};

/// kg CO₂ per hour of equivalent streaming.
const CARBON_PER_HOUR_STREAMING: f64 = 0.05;
/// kg CO₂ per megabyte transferred.
const CARBON_PER_MB_DATA: f64 = 0.000_000_4;
/// kg CO₂ per API request served.
const CARBON_PER_API_REQUEST: f64 = 0.000_001;

/// Device class a session ran on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// Phone-class hardware.
    Mobile,
    /// Tablet-class hardware.
    Tablet,
    /// Laptop-class hardware.
    Laptop,
    /// Desktop-class hardware.
    Desktop,
    /// Unrecognised or unreported device.
    Other,
}

impl DeviceType {
    /// Parse a client-reported label; unknown labels fold into
    /// [`DeviceType::Other`].
    pub fn parse(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "mobile" => Self::Mobile,
            "tablet" => Self::Tablet,
            "laptop" => Self::Laptop,
            "desktop" => Self::Desktop,
            _ => Self::Other,
        }
    }

    /// Relative energy weighting of this device class.
    pub fn factor(self) -> f64 {
        match self {
            Self::Mobile => 0.8,
            Self::Tablet => 0.9,
            Self::Laptop | Self::Other => 1.0,
            Self::Desktop => 1.2,
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Laptop => "laptop",
            Self::Desktop => "desktop",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}

/// Energy source powering a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergySource {
    /// Fully renewable supply.
    Renewable,
    /// Mixed grid supply.
    Mixed,
    /// Fossil-dominated supply.
    Fossil,
    /// Unrecognised or unreported supply.
    Other,
}

impl EnergySource {
    /// Parse a client-reported label; unknown labels fold into
    /// [`EnergySource::Other`].
    pub fn parse(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "renewable" => Self::Renewable,
            "mixed" => Self::Mixed,
            "fossil" => Self::Fossil,
            _ => Self::Other,
        }
    }

    /// Relative carbon intensity of this supply. Unreported supplies are
    /// weighted like the mixed grid.
    pub fn factor(self) -> f64 {
        match self {
            Self::Renewable => 0.3,
            Self::Mixed | Self::Other => 0.7,
            Self::Fossil => 1.0,
        }
    }
}

impl fmt::Display for EnergySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Renewable => "renewable",
            Self::Mixed => "mixed",
            Self::Fossil => "fossil",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}

/// Telemetry captured for one completed learning session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTelemetry {
    /// Session length in hours.
    pub duration_hours: f64,
    /// Data transferred during the session, in megabytes.
    pub data_used_mb: f64,
    /// API requests issued during the session.
    pub api_requests: u32,
    /// Device class the session ran on.
    pub device_type: DeviceType,
    /// Energy source powering the session.
    pub energy_source: EnergySource,
}

/// Validation errors raised before any footprint calculation runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TelemetryValidationError {
    /// A numeric field was negative.
    #[error("{field} must not be negative")]
    Negative {
        /// Offending field name, camelCase as clients report it.
        field: &'static str,
    },
    /// A numeric field was NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite {
        /// Offending field name, camelCase as clients report it.
        field: &'static str,
    },
}

impl SessionTelemetry {
    /// Check the numeric fields before calculation.
    pub fn validate(&self) -> Result<(), TelemetryValidationError> {
        for (field, value) in [
            ("durationHours", self.duration_hours),
            ("dataUsedMb", self.data_used_mb),
        ] {
            if !value.is_finite() {
                return Err(TelemetryValidationError::NotFinite { field });
            }
            if value < 0.0 {
                return Err(TelemetryValidationError::Negative { field });
            }
        }
        Ok(())
    }
}

/// Estimate the CO₂ mass of one session, in kilograms.
///
/// The base estimate weights duration, transfer volume, and API traffic,
/// then scales by device class and energy source. The result is rounded
/// half-up to three decimal places.
///
/// # Examples
/// ```
/// use engine::domain::telemetry::{
///     DeviceType, EnergySource, SessionTelemetry, session_carbon,
/// };
///
/// let telemetry = SessionTelemetry {
///     duration_hours: 1.0,
///     data_used_mb: 0.0,
///     api_requests: 0,
///     device_type: DeviceType::Laptop,
///     energy_source: EnergySource::Fossil,
/// };
/// assert_eq!(session_carbon(&telemetry), Ok(0.05));
/// ```
pub fn session_carbon(telemetry: &SessionTelemetry) -> Result<f64, TelemetryValidationError> {
    telemetry.validate()?;

    let base = telemetry.duration_hours * CARBON_PER_HOUR_STREAMING
        + telemetry.data_used_mb * CARBON_PER_MB_DATA
        + f64::from(telemetry.api_requests) * CARBON_PER_API_REQUEST;
    let carbon = base * telemetry.device_type.factor() * telemetry.energy_source.factor();

    Ok(round_to_grams(carbon))
}

/// Round a kilogram mass half-up to three decimal places (gram
/// resolution).
fn round_to_grams(kg: f64) -> f64 {
    (kg * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn telemetry(
        duration_hours: f64,
        data_used_mb: f64,
        api_requests: u32,
        device_type: DeviceType,
        energy_source: EnergySource,
    ) -> SessionTelemetry {
        SessionTelemetry {
            duration_hours,
            data_used_mb,
            api_requests,
            device_type,
            energy_source,
        }
    }

    #[test]
    fn one_hour_on_a_laptop_over_fossil_power_costs_fifty_grams() {
        let input = telemetry(1.0, 0.0, 0, DeviceType::Laptop, EnergySource::Fossil);
        assert_eq!(session_carbon(&input), Ok(0.050));
    }

    #[test]
    fn renewable_power_cuts_the_same_session_to_fifteen_grams() {
        let input = telemetry(1.0, 0.0, 0, DeviceType::Laptop, EnergySource::Renewable);
        assert_eq!(session_carbon(&input), Ok(0.015));
    }

    #[test]
    fn data_and_api_traffic_contribute_to_the_estimate() {
        // 2h * 0.05 + 500MB * 4e-7 + 1000 req * 1e-6 = 0.1012,
        // scaled by desktop (1.2) and mixed (0.7) = 0.085008 -> 0.085.
        let input = telemetry(2.0, 500.0, 1000, DeviceType::Desktop, EnergySource::Mixed);
        assert_eq!(session_carbon(&input), Ok(0.085));
    }

    #[rstest]
    #[case(-0.5, 0.0, "durationHours")]
    #[case(0.5, -1.0, "dataUsedMb")]
    fn negative_metrics_are_rejected_before_calculation(
        #[case] duration: f64,
        #[case] data: f64,
        #[case] field: &'static str,
    ) {
        let input = telemetry(duration, data, 0, DeviceType::Laptop, EnergySource::Mixed);
        assert_eq!(
            session_carbon(&input),
            Err(TelemetryValidationError::Negative { field })
        );
    }

    #[test]
    fn non_finite_metrics_are_rejected() {
        let input = telemetry(
            f64::NAN,
            0.0,
            0,
            DeviceType::Laptop,
            EnergySource::Renewable,
        );
        assert_eq!(
            session_carbon(&input),
            Err(TelemetryValidationError::NotFinite {
                field: "durationHours"
            })
        );
    }

    #[rstest]
    #[case("Mobile", DeviceType::Mobile)]
    #[case("DESKTOP", DeviceType::Desktop)]
    #[case("smartwatch", DeviceType::Other)]
    fn device_labels_parse_case_insensitively(#[case] label: &str, #[case] expected: DeviceType) {
        assert_eq!(DeviceType::parse(label), expected);
    }

    #[rstest]
    #[case("Renewable", EnergySource::Renewable)]
    #[case("coal", EnergySource::Other)]
    fn energy_labels_parse_case_insensitively(#[case] label: &str, #[case] expected: EnergySource) {
        assert_eq!(EnergySource::parse(label), expected);
    }

    #[test]
    fn unknown_energy_is_weighted_like_the_mixed_grid() {
        assert!((EnergySource::Other.factor() - EnergySource::Mixed.factor()).abs() < f64::EPSILON);
    }
}
