//! Optimization advice — expands detected inefficiencies into actions.
//!
//! Every known cause has one advice template. Templates may reference
//! `{age}`, `{rating}`, `{type}` and `{size}`; a placeholder whose value the
//! inefficiency does not carry is left in the text as written. Records with
//! a cause tag no rule produces are skipped.

use serde::{Deserialize, Serialize};

use crate::profile::Profile;
use crate::reference::ReferenceData;
use crate::rules::{
    detect_inefficiencies, Category, Cause, Finding, Inefficiency, Severity, Utility,
};
use crate::usage::UsageAnswers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Effort {
    Low,
    Medium,
    High,
}

/// One recommended action, ready to display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationAction {
    pub issue: String,
    pub action: String,
    pub effort: Effort,
    pub severity: Severity,
    pub savings: String,
}

// ============================================================================
// CATALOG
// ============================================================================

/// Advice text for one cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionTemplate {
    pub issue: String,
    pub action: String,
    pub effort: Effort,
    pub severity: Severity,
}

impl ActionTemplate {
    fn new(issue: &str, action: &str, effort: Effort, severity: Severity) -> Self {
        Self {
            issue: issue.to_string(),
            action: action.to_string(),
            effort,
            severity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ActionTemplates {
    pub ac_age: ActionTemplate,
    pub ac_rating: ActionTemplate,
    pub geyser_age: ActionTemplate,
    pub geyser_rating: ActionTemplate,
    pub refrigerator_age: ActionTemplate,
    pub refrigerator_rating: ActionTemplate,
    pub lighting_type: ActionTemplate,
    pub shower_flow: ActionTemplate,
    pub toilet_flush: ActionTemplate,
    pub gardening_watering: ActionTemplate,
}

impl ActionTemplates {
    pub fn get(&self, cause: Cause) -> &ActionTemplate {
        match cause {
            Cause::AcAge => &self.ac_age,
            Cause::AcRating => &self.ac_rating,
            Cause::GeyserAge => &self.geyser_age,
            Cause::GeyserRating => &self.geyser_rating,
            Cause::RefrigeratorAge => &self.refrigerator_age,
            Cause::RefrigeratorRating => &self.refrigerator_rating,
            Cause::LightingType => &self.lighting_type,
            Cause::ShowerFlow => &self.shower_flow,
            Cause::ToiletFlush => &self.toilet_flush,
            Cause::GardeningWatering => &self.gardening_watering,
        }
    }
}

impl Default for ActionTemplates {
    fn default() -> Self {
        use Effort as E;
        use Severity as S;
        Self {
            ac_age: ActionTemplate::new(
                "Old Air Conditioner",
                "Your AC is over {age} years old. Consider servicing it or upgrading to a new, energy-efficient 5-star model.",
                E::High,
                S::High,
            ),
            ac_rating: ActionTemplate::new(
                "Inefficient Air Conditioner",
                "Your AC has a low star rating ({rating}-star). Upgrading to a 5-star model can significantly reduce your electricity bill.",
                E::High,
                S::High,
            ),
            geyser_age: ActionTemplate::new(
                "Old Geyser",
                "Your geyser is over {age} years old. Older geysers can be inefficient. Consider replacing it with a new, 5-star rated model.",
                E::High,
                S::Medium,
            ),
            geyser_rating: ActionTemplate::new(
                "Inefficient Geyser",
                "Your geyser has a low star rating ({rating}-star). A 5-star rated geyser will save a lot of energy.",
                E::High,
                S::Medium,
            ),
            refrigerator_age: ActionTemplate::new(
                "Old Refrigerator",
                "Your refrigerator is over {age} years old. Newer models are much more energy-efficient.",
                E::High,
                S::Low,
            ),
            refrigerator_rating: ActionTemplate::new(
                "Inefficient Refrigerator",
                "Your refrigerator has a low star rating ({rating}-star). Consider a 5-star model for your next purchase.",
                E::High,
                S::Low,
            ),
            lighting_type: ActionTemplate::new(
                "Inefficient Lighting",
                "You are using {type} lights. Switching to LED lights can save up to 80% on lighting costs.",
                E::Low,
                S::Medium,
            ),
            shower_flow: ActionTemplate::new(
                "High-flow Shower",
                "Your shower has a high flow rate. Installing a low-flow showerhead can save a significant amount of water.",
                E::Low,
                S::High,
            ),
            toilet_flush: ActionTemplate::new(
                "Inefficient Toilet Flush",
                "You are using a single-flush toilet. Upgrading to a dual-flush system can reduce water usage for flushing by half.",
                E::Medium,
                S::Medium,
            ),
            gardening_watering: ActionTemplate::new(
                "Inefficient Garden Watering",
                "You have a {size} garden. Using a drip irrigation system instead of a hose can save a lot of water.",
                E::Medium,
                S::Low,
            ),
        }
    }
}

/// Coarse savings estimate per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct SavingsRanges {
    pub ac: String,
    pub geyser: String,
    pub refrigerator: String,
    pub lighting: String,
    pub shower: String,
    pub toilet: String,
    pub gardening: String,
}

impl SavingsRanges {
    pub fn get(&self, category: Category) -> &str {
        match category {
            Category::Ac => &self.ac,
            Category::Geyser => &self.geyser,
            Category::Refrigerator => &self.refrigerator,
            Category::Lighting => &self.lighting,
            Category::Shower => &self.shower,
            Category::Toilet => &self.toilet,
            Category::Gardening => &self.gardening,
        }
    }
}

impl Default for SavingsRanges {
    fn default() -> Self {
        Self {
            ac: "~50-100 kWh/month".into(),
            geyser: "~30-50 kWh/month".into(),
            refrigerator: "~15-30 kWh/month".into(),
            lighting: "~20-40 kWh/month".into(),
            shower: "~500-1000 Liters/month".into(),
            toilet: "~300-600 Liters/month".into(),
            gardening: "~200-500 Liters/month".into(),
        }
    }
}

/// Templates plus savings estimates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionCatalog {
    pub templates: ActionTemplates,
    pub savings: SavingsRanges,
}

impl ActionCatalog {
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for &cause in Cause::all() {
            let t = self.templates.get(cause);
            if t.issue.trim().is_empty() || t.action.trim().is_empty() {
                problems.push(format!("template {} has empty text", cause.tag()));
            }
            if t.severity != cause.severity() {
                problems.push(format!(
                    "template {} severity {:?} disagrees with rule severity {:?}",
                    cause.tag(),
                    t.severity,
                    cause.severity()
                ));
            }
            if self.savings.get(cause.category()).trim().is_empty() {
                problems.push(format!("no savings estimate for {}", cause.tag()));
            }
        }
        problems
    }

    /// Build the action for one finding.
    pub fn action_for(&self, finding: &Finding) -> OptimizationAction {
        let cause = finding.cause();
        let template = self.templates.get(cause);
        OptimizationAction {
            issue: template.issue.clone(),
            action: fill_placeholders(&template.action, finding),
            effort: template.effort,
            severity: template.severity,
            savings: self.savings.get(cause.category()).to_string(),
        }
    }
}

/// Replace the first occurrence of each `{key}` the finding has a value for.
fn fill_placeholders(template: &str, finding: &Finding) -> String {
    finding
        .placeholders()
        .into_iter()
        .fold(template.to_string(), |text, (key, value)| {
            text.replacen(&format!("{{{}}}", key), &value, 1)
        })
}

// ============================================================================
// GENERATION
// ============================================================================

/// One action per recognised inefficiency, in input order.
pub fn generate_actions(
    reference: &ReferenceData,
    inefficiencies: &[Inefficiency],
) -> Vec<OptimizationAction> {
    inefficiencies
        .iter()
        .filter_map(|inefficiency| {
            let finding = Finding::from_inefficiency(inefficiency);
            if finding.is_none() {
                log::debug!(
                    "No advice template for cause {}, skipping",
                    inefficiency.cause.as_str()
                );
            }
            finding
        })
        .map(|finding| reference.actions.action_for(&finding))
        .collect()
}

/// Detected inefficiencies together with the advice generated from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationReport {
    pub inefficiencies: Vec<Inefficiency>,
    pub optimization_actions: Vec<OptimizationAction>,
}

/// Detect and advise in one step.
pub fn optimize(
    reference: &ReferenceData,
    profile: &Profile,
    usage: &UsageAnswers,
) -> OptimizationReport {
    let inefficiencies = detect_inefficiencies(reference, profile, usage);
    let optimization_actions = generate_actions(reference, &inefficiencies);
    OptimizationReport {
        inefficiencies,
        optimization_actions,
    }
}

/// Actions split by the bill they reduce.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub electricity: Vec<OptimizationAction>,
    pub water: Vec<OptimizationAction>,
}

impl ActionPlan {
    pub fn is_empty(&self) -> bool {
        self.electricity.is_empty() && self.water.is_empty()
    }
}

pub fn plan_actions(reference: &ReferenceData, inefficiencies: &[Inefficiency]) -> ActionPlan {
    let mut plan = ActionPlan::default();
    for finding in inefficiencies.iter().filter_map(Finding::from_inefficiency) {
        let action = reference.actions.action_for(&finding);
        match finding.cause().utility() {
            Utility::Electricity => plan.electricity.push(action),
            Utility::Water => plan.water.push(action),
        }
    }
    plan
}
