//! Reference data — appliance ratings, water figures, tariffs, bands and advice.
//!
//! Everything the estimator and the rules look up lives in one immutable
//! [`ReferenceData`] value. `Default` gives the built-in tables; a JSON file
//! may override any section. Callers build it once and pass it by reference.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::efficiency::EfficiencyBands;
use crate::recommendations::ActionCatalog;
use crate::rules::RuleThresholds;
use crate::tariffs::Tariffs;
use crate::usage::{LightingType, RefrigeratorType, WashingMachineType};

/// Average appliance draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplianceRatings {
    pub ac_kw: f64,
    pub geyser_kw: f64,
    pub fan_kw: f64,
    pub washing_machine_semi_automatic_kwh_per_cycle: f64,
    pub washing_machine_top_load_kwh_per_cycle: f64,
    pub washing_machine_front_load_kwh_per_cycle: f64,
    pub refrigerator_single_door_kwh_per_day: f64,
    pub refrigerator_double_door_kwh_per_day: f64,
    /// Per bulb.
    pub lighting_led_kw: f64,
    pub lighting_cfl_kw: f64,
    pub lighting_tube_kw: f64,
}

impl Default for ApplianceRatings {
    fn default() -> Self {
        Self {
            ac_kw: 1.5,
            geyser_kw: 2.0,
            fan_kw: 0.075,
            washing_machine_semi_automatic_kwh_per_cycle: 0.3,
            washing_machine_top_load_kwh_per_cycle: 0.5,
            washing_machine_front_load_kwh_per_cycle: 0.4,
            refrigerator_single_door_kwh_per_day: 1.0,
            refrigerator_double_door_kwh_per_day: 1.5,
            lighting_led_kw: 0.01,
            lighting_cfl_kw: 0.015,
            lighting_tube_kw: 0.04,
        }
    }
}

impl ApplianceRatings {
    pub fn washing_machine_kwh(&self, kind: WashingMachineType) -> f64 {
        match kind {
            WashingMachineType::SemiAutomatic => self.washing_machine_semi_automatic_kwh_per_cycle,
            WashingMachineType::TopLoad => self.washing_machine_top_load_kwh_per_cycle,
            WashingMachineType::FrontLoad => self.washing_machine_front_load_kwh_per_cycle,
        }
    }

    pub fn refrigerator_kwh_per_day(&self, kind: RefrigeratorType) -> f64 {
        match kind {
            RefrigeratorType::SingleDoor => self.refrigerator_single_door_kwh_per_day,
            RefrigeratorType::DoubleDoor => self.refrigerator_double_door_kwh_per_day,
        }
    }

    /// Unknown lighting draws nothing.
    pub fn lighting_kw(&self, kind: Option<LightingType>) -> f64 {
        match kind {
            Some(LightingType::Led) => self.lighting_led_kw,
            Some(LightingType::Cfl) => self.lighting_cfl_kw,
            Some(LightingType::Tube) => self.lighting_tube_kw,
            None => 0.0,
        }
    }

    fn values(&self) -> [(&'static str, f64); 11] {
        [
            ("ac_kw", self.ac_kw),
            ("geyser_kw", self.geyser_kw),
            ("fan_kw", self.fan_kw),
            (
                "washing_machine_semi_automatic_kwh_per_cycle",
                self.washing_machine_semi_automatic_kwh_per_cycle,
            ),
            (
                "washing_machine_top_load_kwh_per_cycle",
                self.washing_machine_top_load_kwh_per_cycle,
            ),
            (
                "washing_machine_front_load_kwh_per_cycle",
                self.washing_machine_front_load_kwh_per_cycle,
            ),
            (
                "refrigerator_single_door_kwh_per_day",
                self.refrigerator_single_door_kwh_per_day,
            ),
            (
                "refrigerator_double_door_kwh_per_day",
                self.refrigerator_double_door_kwh_per_day,
            ),
            ("lighting_led_kw", self.lighting_led_kw),
            ("lighting_cfl_kw", self.lighting_cfl_kw),
            ("lighting_tube_kw", self.lighting_tube_kw),
        ]
    }
}

/// Water volumes and behavioural adjustments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterUsage {
    pub bucket_bath_liters: f64,
    pub shower_bath_liters: f64,
    pub low_flow_factor: f64,
    pub high_flow_factor: f64,
    pub toilet_flush_liters: f64,
    pub dual_flush_factor: f64,
    pub clothes_washing_liters_per_load: f64,
    pub pump_liters_per_minute: f64,
    pub garden_liters_per_day: f64,
    pub small_garden_factor: f64,
    pub large_garden_factor: f64,
    /// Applied to the whole daily total when a leak is reported.
    pub leakage_factor: f64,
}

impl Default for WaterUsage {
    fn default() -> Self {
        Self {
            bucket_bath_liters: 40.0,
            shower_bath_liters: 80.0,
            low_flow_factor: 0.8,
            high_flow_factor: 1.2,
            toilet_flush_liters: 10.0,
            dual_flush_factor: 0.75,
            clothes_washing_liters_per_load: 70.0,
            pump_liters_per_minute: 10.0,
            garden_liters_per_day: 50.0,
            small_garden_factor: 0.5,
            large_garden_factor: 1.5,
            leakage_factor: 1.10,
        }
    }
}

impl WaterUsage {
    fn values(&self) -> [(&'static str, f64); 12] {
        [
            ("bucket_bath_liters", self.bucket_bath_liters),
            ("shower_bath_liters", self.shower_bath_liters),
            ("low_flow_factor", self.low_flow_factor),
            ("high_flow_factor", self.high_flow_factor),
            ("toilet_flush_liters", self.toilet_flush_liters),
            ("dual_flush_factor", self.dual_flush_factor),
            (
                "clothes_washing_liters_per_load",
                self.clothes_washing_liters_per_load,
            ),
            ("pump_liters_per_minute", self.pump_liters_per_minute),
            ("garden_liters_per_day", self.garden_liters_per_day),
            ("small_garden_factor", self.small_garden_factor),
            ("large_garden_factor", self.large_garden_factor),
            ("leakage_factor", self.leakage_factor),
        ]
    }
}

/// Consumption multiplier per star rating; better-rated appliances draw less.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarRatingMultipliers {
    #[serde(rename = "1")]
    pub one: f64,
    #[serde(rename = "2")]
    pub two: f64,
    #[serde(rename = "3")]
    pub three: f64,
    #[serde(rename = "4")]
    pub four: f64,
    #[serde(rename = "5")]
    pub five: f64,
}

impl Default for StarRatingMultipliers {
    fn default() -> Self {
        Self {
            one: 1.2,
            two: 1.1,
            three: 1.0,
            four: 0.9,
            five: 0.8,
        }
    }
}

impl StarRatingMultipliers {
    /// Whole ratings 1-5 map to their multiplier; anything else is neutral.
    pub fn multiplier(&self, rating: Option<f64>) -> f64 {
        let Some(r) = rating.filter(|r| r.fract() == 0.0) else {
            return 1.0;
        };
        match r as i64 {
            1 => self.one,
            2 => self.two,
            3 => self.three,
            4 => self.four,
            5 => self.five,
            _ => 1.0,
        }
    }

    fn values(&self) -> [(&'static str, f64); 5] {
        [
            ("1", self.one),
            ("2", self.two),
            ("3", self.three),
            ("4", self.four),
            ("5", self.five),
        ]
    }
}

// ============================================================================
// REFERENCE DATA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceData {
    pub appliances: ApplianceRatings,
    pub water_usage: WaterUsage,
    pub star_ratings: StarRatingMultipliers,
    /// Extra consumption per year of appliance age.
    pub age_factor_per_year: f64,
    pub tariffs: Tariffs,
    pub bands: EfficiencyBands,
    pub thresholds: RuleThresholds,
    pub actions: ActionCatalog,
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self {
            appliances: ApplianceRatings::default(),
            water_usage: WaterUsage::default(),
            star_ratings: StarRatingMultipliers::default(),
            age_factor_per_year: 0.02,
            tariffs: Tariffs::default(),
            bands: EfficiencyBands::default(),
            thresholds: RuleThresholds::default(),
            actions: ActionCatalog::default(),
        }
    }
}

impl ReferenceData {
    /// `1 + factor × age`; unanswered age adds nothing.
    pub fn age_multiplier(&self, age_years: Option<f64>) -> f64 {
        1.0 + self.age_factor_per_year * age_years.unwrap_or(0.0)
    }

    /// Scale a baseline by the appliance's star rating and age.
    pub fn adjust_for_appliance(&self, base: f64, rating: Option<f64>, age_years: Option<f64>) -> f64 {
        base * self.star_ratings.multiplier(rating) * self.age_multiplier(age_years)
    }

    /// Every problem found in the tables. Empty means usable.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for (name, value) in self.appliances.values() {
            if !value.is_finite() || value < 0.0 {
                problems.push(format!("appliance rating {} is invalid: {}", name, value));
            }
        }
        for (name, value) in self.water_usage.values() {
            if !value.is_finite() || value < 0.0 {
                problems.push(format!("water figure {} is invalid: {}", name, value));
            }
        }
        if self.water_usage.leakage_factor < 1.0 {
            problems.push(format!(
                "leakage factor {} would reduce consumption",
                self.water_usage.leakage_factor
            ));
        }
        for (stars, value) in self.star_ratings.values() {
            if !value.is_finite() || value <= 0.0 {
                problems.push(format!("{}-star multiplier is invalid: {}", stars, value));
            }
        }
        if !self.age_factor_per_year.is_finite() || self.age_factor_per_year < 0.0 {
            problems.push(format!(
                "age factor is invalid: {}",
                self.age_factor_per_year
            ));
        }

        problems.extend(self.tariffs.validate());

        if !self.bands.electricity.is_ascending() {
            problems.push("electricity efficiency bands are not ascending".into());
        }
        if !self.bands.water.is_ascending() {
            problems.push("water efficiency bands are not ascending".into());
        }

        problems.extend(self.actions.validate());
        problems
    }

    /// Parse and validate reference data from JSON. Missing sections keep
    /// their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ReferenceError> {
        let data: ReferenceData = serde_json::from_str(json)?;
        let problems = data.validate();
        if !problems.is_empty() {
            for p in &problems {
                log::warn!("Reference data problem: {}", p);
            }
            return Err(ReferenceError::Invalid(problems));
        }
        Ok(data)
    }

    /// Load reference data from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let data = Self::from_json_str(&json)?;
        log::info!("Loaded reference data from {}", path.display());
        Ok(data)
    }
}

/// Errors that can occur loading reference data
#[derive(Debug)]
pub enum ReferenceError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(Vec<String>),
}

impl From<std::io::Error> for ReferenceError {
    fn from(e: std::io::Error) -> Self {
        ReferenceError::Io(e)
    }
}

impl From<serde_json::Error> for ReferenceError {
    fn from(e: serde_json::Error) -> Self {
        ReferenceError::Parse(e)
    }
}

impl std::fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceError::Io(e) => write!(f, "IO error: {}", e),
            ReferenceError::Parse(e) => write!(f, "Parse error: {}", e),
            ReferenceError::Invalid(problems) => {
                write!(f, "Invalid reference data: {}", problems.join("; "))
            }
        }
    }
}

impl std::error::Error for ReferenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReferenceError::Io(e) => Some(e),
            ReferenceError::Parse(e) => Some(e),
            ReferenceError::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Region;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ReferenceData::default().validate().is_empty());
    }

    #[test]
    fn test_star_rating_multiplier() {
        let m = StarRatingMultipliers::default();
        assert_eq!(m.multiplier(Some(1.0)), 1.2);
        assert_eq!(m.multiplier(Some(3.0)), 1.0);
        assert_eq!(m.multiplier(Some(5.0)), 0.8);
        assert_eq!(m.multiplier(Some(0.0)), 1.0);
        assert_eq!(m.multiplier(Some(6.0)), 1.0);
        assert_eq!(m.multiplier(Some(4.5)), 1.0);
        assert_eq!(m.multiplier(None), 1.0);
    }

    #[test]
    fn test_age_multiplier() {
        let r = ReferenceData::default();
        assert_eq!(r.age_multiplier(None), 1.0);
        assert!((r.age_multiplier(Some(2.0)) - 1.04).abs() < 1e-12);
        assert!((r.age_multiplier(Some(10.0)) - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_adjust_for_appliance() {
        let r = ReferenceData::default();
        let adjusted = r.adjust_for_appliance(180.0, Some(5.0), Some(2.0));
        assert!((adjusted - 149.76).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let r = ReferenceData::from_json_str(
            r#"{"tariffs": {"electricity": {"DELHI": 9, "MUMBAI": 10, "KARNATAKA": 7, "TAMIL_NADU": 6, "OTHER": 7.5}}}"#,
        )
        .unwrap();
        assert_eq!(r.tariffs.electricity.rate(Region::Delhi), 9.0);
        assert_eq!(r.tariffs.water.rate(Region::Delhi), 4.0);
        assert_eq!(r.appliances, ApplianceRatings::default());
    }

    #[test]
    fn test_default_roundtrips_through_json() {
        let json = serde_json::to_string(&ReferenceData::default()).unwrap();
        let back = ReferenceData::from_json_str(&json).unwrap();
        assert_eq!(back, ReferenceData::default());
    }

    #[test]
    fn test_invalid_tables_rejected() {
        let err = ReferenceData::from_json_str(
            r#"{"appliances": {"ac_kw": -1.5}, "bands": {"water": {"efficient": 300, "moderate": 180, "inefficient": 250}}}"#,
        )
        .unwrap_err();
        match err {
            ReferenceError::Invalid(problems) => {
                assert_eq!(problems.len(), 2);
                assert!(problems[0].contains("ac_kw"));
                assert!(problems[1].contains("water efficiency bands"));
            }
            other => panic!("expected Invalid, got {}", other),
        }
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = ReferenceData::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ReferenceError::Parse(_)));
        assert!(err.to_string().starts_with("Parse error"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ReferenceData::load("/definitely/not/here/reference.json").unwrap_err();
        assert!(matches!(err, ReferenceError::Io(_)));
    }
}
