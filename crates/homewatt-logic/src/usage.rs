//! Questionnaire answers — appliance usage and water habits.
//!
//! Answers keep the shape the questionnaire submits them in: two flat groups
//! (`electricity`, `water`) of optional fields. Numbers may arrive as numeric
//! strings and category answers are free text, so decoding is permissive and
//! typed views are exposed through accessor methods instead.

use serde::{Deserialize, Serialize};

use crate::lenient::{self, answer_is};

// ============================================================================
// CATEGORY ANSWERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefrigeratorType {
    SingleDoor,
    DoubleDoor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WashingMachineType {
    SemiAutomatic,
    TopLoad,
    FrontLoad,
}

impl WashingMachineType {
    /// Parse `semi-automatic`, `top_load`, `Front Load`, ... Unknown names give `None`.
    pub fn from_answer(answer: &str) -> Option<Self> {
        let normalized: String = answer
            .trim()
            .chars()
            .map(|c| match c {
                '_' | ' ' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        match normalized.as_str() {
            "semi-automatic" => Some(Self::SemiAutomatic),
            "top-load" => Some(Self::TopLoad),
            "front-load" => Some(Self::FrontLoad),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightingType {
    Led,
    Cfl,
    Tube,
}

impl LightingType {
    pub fn from_answer(answer: &str) -> Option<Self> {
        match answer.trim().to_ascii_lowercase().as_str() {
            "led" => Some(Self::Led),
            "cfl" => Some(Self::Cfl),
            "tube" => Some(Self::Tube),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BathingMode {
    Shower,
    Bucket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowRate {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushType {
    Single,
    Dual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GardenSize {
    Small,
    Medium,
    Large,
}

// ============================================================================
// ANSWERS
// ============================================================================

/// Complete questionnaire submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageAnswers {
    #[serde(default)]
    pub electricity: ElectricityAnswers,
    #[serde(default)]
    pub water: WaterAnswers,
}

/// Appliance answers. Usage figures are per day unless named otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricityAnswers {
    /// Hours of AC use per day.
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub ac_usage: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub ac_star_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub ac_age: Option<f64>,
    /// Minutes of geyser use per day.
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub geyser_usage: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub geyser_star_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub geyser_age: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub refrigerator_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub refrigerator_star_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub refrigerator_age: Option<f64>,
    /// Washing machine cycles per week.
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub washing_machine_cycles: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub washing_machine_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub lighting_type: Option<String>,
    /// Hours of lighting per day.
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub lighting_duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub fan_count: Option<f64>,
    /// Hours of fan use per day.
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub fan_duration: Option<f64>,
}

impl ElectricityAnswers {
    /// Anything but an explicit `double` is a single-door unit.
    pub fn refrigerator_type(&self) -> RefrigeratorType {
        if answer_is(self.refrigerator_type.as_deref(), "double") {
            RefrigeratorType::DoubleDoor
        } else {
            RefrigeratorType::SingleDoor
        }
    }

    /// Unanswered or unknown types are costed as a top-loader.
    pub fn washing_machine_type(&self) -> WashingMachineType {
        self.washing_machine_type
            .as_deref()
            .and_then(WashingMachineType::from_answer)
            .unwrap_or(WashingMachineType::TopLoad)
    }

    pub fn lighting_type(&self) -> Option<LightingType> {
        self.lighting_type
            .as_deref()
            .and_then(LightingType::from_answer)
    }
}

/// Water habit answers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterAnswers {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub bathing: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub shower_flow_rate: Option<String>,
    /// Baths per person per day.
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub bath_frequency: Option<f64>,
    /// Minutes of pump use per day.
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub pump_usage: Option<f64>,
    /// Flushes per person per day.
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub toilet_flushes: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub toilet_flush_type: Option<String>,
    /// Clothes washing loads per week.
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub washing_clothes: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub gardening: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub garden_size: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub water_leakage: Option<String>,
}

impl WaterAnswers {
    /// Anything but an explicit `shower` is a bucket bath.
    pub fn bathing_mode(&self) -> BathingMode {
        if answer_is(self.bathing.as_deref(), "shower") {
            BathingMode::Shower
        } else {
            BathingMode::Bucket
        }
    }

    /// Unanswered or unknown flow rates are treated as medium.
    pub fn shower_flow(&self) -> FlowRate {
        match self.shower_flow_rate.as_deref() {
            Some(r) if r.eq_ignore_ascii_case("low") => FlowRate::Low,
            Some(r) if r.eq_ignore_ascii_case("high") => FlowRate::High,
            _ => FlowRate::Medium,
        }
    }

    pub fn flush_type(&self) -> Option<FlushType> {
        match self.toilet_flush_type.as_deref() {
            Some(t) if t.eq_ignore_ascii_case("single") => Some(FlushType::Single),
            Some(t) if t.eq_ignore_ascii_case("dual") => Some(FlushType::Dual),
            _ => None,
        }
    }

    pub fn gardening_enabled(&self) -> bool {
        answer_is(self.gardening.as_deref(), "yes")
    }

    pub fn garden_size(&self) -> Option<GardenSize> {
        match self.garden_size.as_deref() {
            Some(s) if s.eq_ignore_ascii_case("small") => Some(GardenSize::Small),
            Some(s) if s.eq_ignore_ascii_case("medium") => Some(GardenSize::Medium),
            Some(s) if s.eq_ignore_ascii_case("large") => Some(GardenSize::Large),
            _ => None,
        }
    }

    pub fn leakage_reported(&self) -> bool {
        answer_is(self.water_leakage.as_deref(), "yes")
    }
}
