//! Consumption estimation — questionnaire answers to monthly electricity and
//! daily water totals, per-person figures, efficiency tiers and cost.
//!
//! Electricity is the sum of six independent contributions (AC, geyser,
//! refrigerator, washing machine, lighting, fans) in kWh/month. Water is the
//! sum of five (bathing, toilet, clothes washing, pump, gardening) in L/day,
//! with a leak scaling the whole sum. Never fails: unanswered fields fall
//! back to documented defaults.

use serde::{Deserialize, Serialize};

use crate::efficiency::{EfficiencyTier, TierBands};
use crate::lenient::or_default;
use crate::profile::Profile;
use crate::reference::ReferenceData;
use crate::usage::{
    BathingMode, ElectricityAnswers, FlowRate, FlushType, GardenSize, UsageAnswers, WaterAnswers,
};

const DAYS_PER_MONTH: f64 = 30.0;
const WEEKS_PER_MONTH: f64 = 4.0;
const DAYS_PER_WEEK: f64 = 7.0;

/// Fallbacks for unanswered (or zero) questions.
mod defaults {
    pub const LIGHTING_HOURS: f64 = 6.0;
    pub const FAN_HOURS: f64 = 8.0;
    pub const BATHS_PER_DAY: f64 = 1.0;
    pub const FLUSHES_PER_DAY: f64 = 1.0;
    /// Bulb count when the fan count (used as its stand-in) is unanswered.
    pub const BULB_COUNT: f64 = 1.0;
}

/// Round to 2 decimal places. Values too large to scale are returned as is.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}

/// Clamp to the finite range; NaN becomes 0.
fn saturate(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(f64::MIN, f64::MAX)
    }
}

// ============================================================================
// BREAKDOWN
// ============================================================================

/// Unrounded kWh/month per appliance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ElectricityBreakdown {
    pub ac: f64,
    pub geyser: f64,
    pub refrigerator: f64,
    pub washing_machine: f64,
    pub lighting: f64,
    pub fans: f64,
}

impl ElectricityBreakdown {
    pub fn total(&self) -> f64 {
        self.ac + self.geyser + self.refrigerator + self.washing_machine + self.lighting + self.fans
    }
}

/// Unrounded L/day per use, before the leak adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterBreakdown {
    pub bathing: f64,
    pub toilet: f64,
    pub clothes_washing: f64,
    pub pump: f64,
    pub gardening: f64,
    /// 1.0 without a reported leak.
    pub leakage_factor: f64,
}

impl WaterBreakdown {
    pub fn subtotal(&self) -> f64 {
        self.bathing + self.toilet + self.clothes_washing + self.pump + self.gardening
    }

    pub fn total(&self) -> f64 {
        self.subtotal() * self.leakage_factor
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionBreakdown {
    pub electricity: ElectricityBreakdown,
    pub water: WaterBreakdown,
}

pub fn electricity_breakdown(
    reference: &ReferenceData,
    answers: &ElectricityAnswers,
) -> ElectricityBreakdown {
    let ratings = &reference.appliances;

    let ac_base = answers.ac_usage.unwrap_or(0.0) * ratings.ac_kw * DAYS_PER_MONTH;
    let geyser_base = answers.geyser_usage.unwrap_or(0.0) / 60.0 * ratings.geyser_kw * DAYS_PER_MONTH;
    // Age and rating scale the fixed baseline, not a usage figure.
    let fridge_base =
        ratings.refrigerator_kwh_per_day(answers.refrigerator_type()) * DAYS_PER_MONTH;

    // The fan count stands in for the bulb count; there is no bulb question.
    let bulbs = or_default(answers.fan_count, defaults::BULB_COUNT);

    ElectricityBreakdown {
        ac: reference.adjust_for_appliance(ac_base, answers.ac_star_rating, answers.ac_age),
        geyser: reference.adjust_for_appliance(
            geyser_base,
            answers.geyser_star_rating,
            answers.geyser_age,
        ),
        refrigerator: reference.adjust_for_appliance(
            fridge_base,
            answers.refrigerator_star_rating,
            answers.refrigerator_age,
        ),
        washing_machine: answers.washing_machine_cycles.unwrap_or(0.0)
            * ratings.washing_machine_kwh(answers.washing_machine_type())
            * WEEKS_PER_MONTH,
        lighting: ratings.lighting_kw(answers.lighting_type())
            * bulbs
            * or_default(answers.lighting_duration, defaults::LIGHTING_HOURS)
            * DAYS_PER_MONTH,
        fans: answers.fan_count.unwrap_or(0.0)
            * ratings.fan_kw
            * or_default(answers.fan_duration, defaults::FAN_HOURS)
            * DAYS_PER_MONTH,
    }
}

pub fn water_breakdown(
    reference: &ReferenceData,
    residents: f64,
    answers: &WaterAnswers,
) -> WaterBreakdown {
    let w = &reference.water_usage;

    let bath_liters = match answers.bathing_mode() {
        BathingMode::Shower => {
            w.shower_bath_liters
                * match answers.shower_flow() {
                    FlowRate::Low => w.low_flow_factor,
                    FlowRate::Medium => 1.0,
                    FlowRate::High => w.high_flow_factor,
                }
        }
        BathingMode::Bucket => w.bucket_bath_liters,
    };

    let flush_liters = match answers.flush_type() {
        Some(FlushType::Dual) => w.toilet_flush_liters * w.dual_flush_factor,
        _ => w.toilet_flush_liters,
    };

    let gardening = if answers.gardening_enabled() {
        w.garden_liters_per_day
            * match answers.garden_size() {
                Some(GardenSize::Small) => w.small_garden_factor,
                Some(GardenSize::Large) => w.large_garden_factor,
                Some(GardenSize::Medium) | None => 1.0,
            }
    } else {
        0.0
    };

    WaterBreakdown {
        bathing: bath_liters
            * or_default(answers.bath_frequency, defaults::BATHS_PER_DAY)
            * residents,
        toilet: flush_liters
            * or_default(answers.toilet_flushes, defaults::FLUSHES_PER_DAY)
            * residents,
        clothes_washing: answers.washing_clothes.unwrap_or(0.0)
            * w.clothes_washing_liters_per_load
            / DAYS_PER_WEEK
            * residents,
        pump: answers.pump_usage.unwrap_or(0.0) * w.pump_liters_per_minute,
        gardening,
        leakage_factor: if answers.leakage_reported() {
            w.leakage_factor
        } else {
            1.0
        },
    }
}

/// Per-contribution figures behind [`estimate_consumption`].
pub fn consumption_breakdown(
    reference: &ReferenceData,
    profile: &Profile,
    usage: &UsageAnswers,
) -> ConsumptionBreakdown {
    ConsumptionBreakdown {
        electricity: electricity_breakdown(reference, &usage.electricity),
        water: water_breakdown(reference, profile.occupancy(), &usage.water),
    }
}

// ============================================================================
// RESULT
// ============================================================================

/// Totals for one utility, rounded to 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilitySummary {
    pub total: f64,
    pub per_person: f64,
    pub efficiency: EfficiencyTier,
    pub cost: f64,
}

impl UtilitySummary {
    fn new(total: f64, residents: f64, bands: &TierBands, cost: f64) -> Self {
        let total = saturate(total);
        let per_person = total / residents;
        Self {
            total: round2(total),
            per_person: round2(per_person),
            efficiency: bands.classify(per_person),
            cost: round2(saturate(cost)),
        }
    }
}

/// Electricity in kWh/month, water in L/day; both costs are monthly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionResult {
    pub electricity: UtilitySummary,
    pub water: UtilitySummary,
}

/// Estimate a household's consumption, efficiency and cost.
pub fn estimate_consumption(
    reference: &ReferenceData,
    profile: &Profile,
    usage: &UsageAnswers,
) -> ConsumptionResult {
    let breakdown = consumption_breakdown(reference, profile, usage);
    let residents = profile.occupancy();
    let electricity = breakdown.electricity.total();
    let water = breakdown.water.total();
    let tariffs = &reference.tariffs;

    ConsumptionResult {
        electricity: UtilitySummary::new(
            electricity,
            residents,
            &reference.bands.electricity,
            tariffs.electricity_cost(profile.region, electricity),
        ),
        water: UtilitySummary::new(
            water,
            residents,
            &reference.bands.water,
            tariffs.water_cost(profile.region, water),
        ),
    }
}
