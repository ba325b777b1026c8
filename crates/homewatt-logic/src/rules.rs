//! Inefficiency detection — fixed threshold rules over the questionnaire.
//!
//! Each rule is evaluated independently and in a fixed order; any number may
//! fire for one household. A rule whose input was not answered never fires.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::lenient;
use crate::profile::Profile;
use crate::reference::ReferenceData;
use crate::usage::{BathingMode, FlowRate, FlushType, GardenSize, UsageAnswers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Which utility bill an inefficiency inflates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Utility {
    Electricity,
    Water,
}

/// Appliance or habit family, used to pick a savings estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Ac,
    Geyser,
    Refrigerator,
    Lighting,
    Shower,
    Toilet,
    Gardening,
}

// ============================================================================
// CAUSES
// ============================================================================

/// The rule that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cause {
    AcAge,
    AcRating,
    GeyserAge,
    GeyserRating,
    RefrigeratorAge,
    RefrigeratorRating,
    LightingType,
    ShowerFlow,
    ToiletFlush,
    GardeningWatering,
}

impl Cause {
    /// All causes in rule evaluation order.
    pub fn all() -> &'static [Cause] {
        &[
            Self::AcAge,
            Self::AcRating,
            Self::GeyserAge,
            Self::GeyserRating,
            Self::RefrigeratorAge,
            Self::RefrigeratorRating,
            Self::LightingType,
            Self::ShowerFlow,
            Self::ToiletFlush,
            Self::GardeningWatering,
        ]
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::AcAge => "AC_AGE",
            Self::AcRating => "AC_RATING",
            Self::GeyserAge => "GEYSER_AGE",
            Self::GeyserRating => "GEYSER_RATING",
            Self::RefrigeratorAge => "REFRIGERATOR_AGE",
            Self::RefrigeratorRating => "REFRIGERATOR_RATING",
            Self::LightingType => "LIGHTING_TYPE",
            Self::ShowerFlow => "SHOWER_FLOW",
            Self::ToiletFlush => "TOILET_FLUSH",
            Self::GardeningWatering => "GARDENING_WATERING",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.tag() == tag)
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::AcAge | Self::AcRating | Self::ShowerFlow => Severity::High,
            Self::GeyserAge | Self::GeyserRating | Self::LightingType | Self::ToiletFlush => {
                Severity::Medium
            }
            Self::RefrigeratorAge | Self::RefrigeratorRating | Self::GardeningWatering => {
                Severity::Low
            }
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::AcAge | Self::AcRating => Category::Ac,
            Self::GeyserAge | Self::GeyserRating => Category::Geyser,
            Self::RefrigeratorAge | Self::RefrigeratorRating => Category::Refrigerator,
            Self::LightingType => Category::Lighting,
            Self::ShowerFlow => Category::Shower,
            Self::ToiletFlush => Category::Toilet,
            Self::GardeningWatering => Category::Gardening,
        }
    }

    pub fn utility(&self) -> Utility {
        match self.category() {
            Category::Ac | Category::Geyser | Category::Refrigerator | Category::Lighting => {
                Utility::Electricity
            }
            Category::Shower | Category::Toilet | Category::Gardening => Utility::Water,
        }
    }
}

/// A cause tag as it appears on the wire. Tags from other producers may not
/// name a known rule; those are carried along and skipped when advising.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CauseTag {
    Known(Cause),
    Unrecognized(String),
}

impl CauseTag {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(cause) => cause.tag(),
            Self::Unrecognized(tag) => tag,
        }
    }

    pub fn known(&self) -> Option<Cause> {
        match self {
            Self::Known(cause) => Some(*cause),
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<Cause> for CauseTag {
    fn from(cause: Cause) -> Self {
        Self::Known(cause)
    }
}

impl Serialize for CauseTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CauseTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(match Cause::from_tag(&tag) {
            Some(cause) => Self::Known(cause),
            None => Self::Unrecognized(tag),
        })
    }
}

// ============================================================================
// INEFFICIENCY RECORDS
// ============================================================================

/// An observed age or rating. Records from other producers may carry text
/// where a number is expected; it is kept so the advice can still show it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reading {
    Number(f64),
    Text(String),
}

impl Reading {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl From<f64> for Reading {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl std::fmt::Display for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Numbers and numeric strings become `Number`; other non-blank text is kept.
fn reading<'de, D>(deserializer: D) -> Result<Option<Reading>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::text(deserializer)?.map(|text| match text.parse::<f64>() {
        Ok(n) if n.is_finite() => Reading::Number(n),
        _ => Reading::Text(text),
    }))
}

/// Values observed by a rule, available to the advice text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(default, deserialize_with = "reading", skip_serializing_if = "Option::is_none")]
    pub age: Option<Reading>,
    #[serde(default, deserialize_with = "reading", skip_serializing_if = "Option::is_none")]
    pub rating: Option<Reading>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl Evidence {
    pub fn is_empty(&self) -> bool {
        self.age.is_none() && self.rating.is_none() && self.kind.is_none() && self.size.is_none()
    }
}

/// One detected inefficiency, in its serializable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inefficiency {
    pub cause: CauseTag,
    pub severity: Severity,
    #[serde(
        default,
        deserialize_with = "evidence_or_empty",
        skip_serializing_if = "Evidence::is_empty"
    )]
    pub data: Evidence,
}

fn evidence_or_empty<'de, D>(deserializer: D) -> Result<Evidence, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Evidence>::deserialize(deserializer)?.unwrap_or_default())
}

/// Typed view of an inefficiency: one variant per cause, carrying exactly the
/// values its advice text refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    AcAge { age: Option<Reading> },
    AcRating { rating: Option<Reading> },
    GeyserAge { age: Option<Reading> },
    GeyserRating { rating: Option<Reading> },
    RefrigeratorAge { age: Option<Reading> },
    RefrigeratorRating { rating: Option<Reading> },
    LightingType { kind: Option<String> },
    ShowerFlow,
    ToiletFlush,
    GardeningWatering { size: Option<String> },
}

impl Finding {
    pub fn cause(&self) -> Cause {
        match self {
            Self::AcAge { .. } => Cause::AcAge,
            Self::AcRating { .. } => Cause::AcRating,
            Self::GeyserAge { .. } => Cause::GeyserAge,
            Self::GeyserRating { .. } => Cause::GeyserRating,
            Self::RefrigeratorAge { .. } => Cause::RefrigeratorAge,
            Self::RefrigeratorRating { .. } => Cause::RefrigeratorRating,
            Self::LightingType { .. } => Cause::LightingType,
            Self::ShowerFlow => Cause::ShowerFlow,
            Self::ToiletFlush => Cause::ToiletFlush,
            Self::GardeningWatering { .. } => Cause::GardeningWatering,
        }
    }

    /// `None` when the record's cause is not a known rule.
    pub fn from_inefficiency(inefficiency: &Inefficiency) -> Option<Self> {
        let data = &inefficiency.data;
        let finding = match inefficiency.cause.known()? {
            Cause::AcAge => Self::AcAge {
                age: data.age.clone(),
            },
            Cause::AcRating => Self::AcRating {
                rating: data.rating.clone(),
            },
            Cause::GeyserAge => Self::GeyserAge {
                age: data.age.clone(),
            },
            Cause::GeyserRating => Self::GeyserRating {
                rating: data.rating.clone(),
            },
            Cause::RefrigeratorAge => Self::RefrigeratorAge {
                age: data.age.clone(),
            },
            Cause::RefrigeratorRating => Self::RefrigeratorRating {
                rating: data.rating.clone(),
            },
            Cause::LightingType => Self::LightingType {
                kind: data.kind.clone(),
            },
            Cause::ShowerFlow => Self::ShowerFlow,
            Cause::ToiletFlush => Self::ToiletFlush,
            Cause::GardeningWatering => Self::GardeningWatering {
                size: data.size.clone(),
            },
        };
        Some(finding)
    }

    pub fn evidence(&self) -> Evidence {
        match self {
            Self::AcAge { age } | Self::GeyserAge { age } | Self::RefrigeratorAge { age } => {
                Evidence {
                    age: age.clone(),
                    ..Default::default()
                }
            }
            Self::AcRating { rating }
            | Self::GeyserRating { rating }
            | Self::RefrigeratorRating { rating } => Evidence {
                rating: rating.clone(),
                ..Default::default()
            },
            Self::LightingType { kind } => Evidence {
                kind: kind.clone(),
                ..Default::default()
            },
            Self::ShowerFlow | Self::ToiletFlush => Evidence::default(),
            Self::GardeningWatering { size } => Evidence {
                size: size.clone(),
                ..Default::default()
            },
        }
    }

    /// `(placeholder, value)` pairs for the values this finding actually holds.
    pub fn placeholders(&self) -> Vec<(&'static str, String)> {
        let evidence = self.evidence();
        let mut pairs = Vec::new();
        if let Some(age) = evidence.age {
            pairs.push(("age", age.to_string()));
        }
        if let Some(rating) = evidence.rating {
            pairs.push(("rating", rating.to_string()));
        }
        if let Some(kind) = evidence.kind {
            pairs.push(("type", kind));
        }
        if let Some(size) = evidence.size {
            pairs.push(("size", size));
        }
        pairs
    }
}

impl From<Finding> for Inefficiency {
    fn from(finding: Finding) -> Self {
        let cause = finding.cause();
        Self {
            cause: cause.into(),
            severity: cause.severity(),
            data: finding.evidence(),
        }
    }
}

// ============================================================================
// RULES
// ============================================================================

/// Rule thresholds. Ages fire when strictly above, ratings when strictly below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleThresholds {
    pub ac_max_age_years: f64,
    pub geyser_max_age_years: f64,
    pub refrigerator_max_age_years: f64,
    pub min_star_rating: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            ac_max_age_years: 10.0,
            geyser_max_age_years: 8.0,
            refrigerator_max_age_years: 10.0,
            min_star_rating: 3.0,
        }
    }
}

fn above(value: Option<f64>, limit: f64) -> bool {
    value.is_some_and(|v| v > limit)
}

fn below(value: Option<f64>, limit: f64) -> bool {
    value.is_some_and(|v| v < limit)
}

/// Run every rule in order and return the typed findings.
pub fn detect_findings(thresholds: &RuleThresholds, usage: &UsageAnswers) -> Vec<Finding> {
    let e = &usage.electricity;
    let w = &usage.water;
    let mut findings = Vec::new();

    // Electricity
    if above(e.ac_age, thresholds.ac_max_age_years) {
        findings.push(Finding::AcAge {
            age: e.ac_age.map(Reading::from),
        });
    }
    if below(e.ac_star_rating, thresholds.min_star_rating) {
        findings.push(Finding::AcRating {
            rating: e.ac_star_rating.map(Reading::from),
        });
    }
    if above(e.geyser_age, thresholds.geyser_max_age_years) {
        findings.push(Finding::GeyserAge {
            age: e.geyser_age.map(Reading::from),
        });
    }
    if below(e.geyser_star_rating, thresholds.min_star_rating) {
        findings.push(Finding::GeyserRating {
            rating: e.geyser_star_rating.map(Reading::from),
        });
    }
    if above(e.refrigerator_age, thresholds.refrigerator_max_age_years) {
        findings.push(Finding::RefrigeratorAge {
            age: e.refrigerator_age.map(Reading::from),
        });
    }
    if below(e.refrigerator_star_rating, thresholds.min_star_rating) {
        findings.push(Finding::RefrigeratorRating {
            rating: e.refrigerator_star_rating.map(Reading::from),
        });
    }
    if let Some(kind) = e.lighting_type.as_deref() {
        if !kind.eq_ignore_ascii_case("led") {
            findings.push(Finding::LightingType {
                kind: Some(kind.to_uppercase()),
            });
        }
    }

    // Water
    if w.bathing_mode() == BathingMode::Shower && w.shower_flow() == FlowRate::High {
        findings.push(Finding::ShowerFlow);
    }
    if w.flush_type() == Some(FlushType::Single) {
        findings.push(Finding::ToiletFlush);
    }
    if w.gardening_enabled() && w.garden_size() != Some(GardenSize::Small) {
        findings.push(Finding::GardeningWatering {
            size: w.garden_size.clone(),
        });
    }

    findings
}

/// Detect inefficiencies in a household's answers, in rule order.
///
/// The profile is accepted for call-site symmetry with the estimator; no
/// current rule depends on it.
pub fn detect_inefficiencies(
    reference: &ReferenceData,
    _profile: &Profile,
    usage: &UsageAnswers,
) -> Vec<Inefficiency> {
    let found: Vec<Inefficiency> = detect_findings(&reference.thresholds, usage)
        .into_iter()
        .map(Inefficiency::from)
        .collect();
    log::debug!("Detected {} inefficiencies", found.len());
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(usage: &UsageAnswers) -> Vec<Inefficiency> {
        detect_inefficiencies(&ReferenceData::default(), &Profile::default(), usage)
    }

    fn causes(found: &[Inefficiency]) -> Vec<Cause> {
        found.iter().filter_map(|i| i.cause.known()).collect()
    }

    #[test]
    fn test_empty_answers_fire_nothing() {
        assert!(detect(&UsageAnswers::default()).is_empty());
    }

    #[test]
    fn test_every_rule_fires_in_order() {
        let mut usage = UsageAnswers::default();
        let e = &mut usage.electricity;
        e.ac_age = Some(12.0);
        e.ac_star_rating = Some(2.0);
        e.geyser_age = Some(9.0);
        e.geyser_star_rating = Some(1.0);
        e.refrigerator_age = Some(11.0);
        e.refrigerator_star_rating = Some(2.0);
        e.lighting_type = Some("cfl".into());
        let w = &mut usage.water;
        w.bathing = Some("shower".into());
        w.shower_flow_rate = Some("high".into());
        w.toilet_flush_type = Some("single".into());
        w.gardening = Some("yes".into());
        w.garden_size = Some("large".into());

        let found = detect(&usage);
        assert_eq!(causes(&found), Cause::all().to_vec());
        for i in &found {
            let cause = i.cause.known().unwrap();
            assert_eq!(i.severity, cause.severity());
        }
    }

    #[test]
    fn test_age_thresholds_are_strict() {
        let mut usage = UsageAnswers::default();
        usage.electricity.ac_age = Some(10.0);
        usage.electricity.geyser_age = Some(8.0);
        usage.electricity.refrigerator_age = Some(10.0);
        assert!(detect(&usage).is_empty());

        usage.electricity.geyser_age = Some(8.5);
        assert_eq!(causes(&detect(&usage)), vec![Cause::GeyserAge]);
    }

    #[test]
    fn test_rating_three_does_not_fire() {
        let mut usage = UsageAnswers::default();
        usage.electricity.ac_star_rating = Some(3.0);
        assert!(detect(&usage).is_empty());
    }

    #[test]
    fn test_unanswered_numbers_never_fire() {
        let usage: UsageAnswers = serde_json::from_str(
            r#"{"electricity": {"acAge": "", "acStarRating": null, "geyserStarRating": "n/a"}}"#,
        )
        .unwrap();
        assert!(detect(&usage).is_empty());
    }

    #[test]
    fn test_rule_evidence_carries_values() {
        let mut usage = UsageAnswers::default();
        usage.electricity.ac_age = Some(15.0);
        usage.electricity.refrigerator_star_rating = Some(1.0);
        let found = detect(&usage);
        assert_eq!(found[0].data.age, Some(Reading::Number(15.0)));
        assert_eq!(found[1].data.rating, Some(Reading::Number(1.0)));
        assert_eq!(found[1].severity, Severity::Low);
    }

    #[test]
    fn test_lighting_rule_case_insensitive() {
        let mut usage = UsageAnswers::default();
        usage.electricity.lighting_type = Some("LED".into());
        assert!(detect(&usage).is_empty());

        usage.electricity.lighting_type = Some("tube".into());
        let found = detect(&usage);
        assert_eq!(causes(&found), vec![Cause::LightingType]);
        assert_eq!(found[0].data.kind.as_deref(), Some("TUBE"));
        assert_eq!(found[0].severity, Severity::Medium);
    }

    #[test]
    fn test_shower_rule_needs_shower_and_high_flow() {
        let mut usage = UsageAnswers::default();
        usage.water.shower_flow_rate = Some("high".into());
        usage.water.bathing = Some("bucket".into());
        assert!(detect(&usage).is_empty());

        usage.water.bathing = Some("shower".into());
        let found = detect(&usage);
        assert_eq!(causes(&found), vec![Cause::ShowerFlow]);
        assert!(found[0].data.is_empty());
    }

    #[test]
    fn test_dual_flush_is_fine() {
        let mut usage = UsageAnswers::default();
        usage.water.toilet_flush_type = Some("dual".into());
        assert!(detect(&usage).is_empty());
    }

    #[test]
    fn test_small_garden_does_not_fire() {
        let mut usage = UsageAnswers::default();
        usage.water.gardening = Some("yes".into());
        usage.water.garden_size = Some("small".into());
        assert!(detect(&usage).is_empty());

        usage.water.garden_size = None;
        let found = detect(&usage);
        assert_eq!(causes(&found), vec![Cause::GardeningWatering]);
        assert_eq!(found[0].data.size, None);

        usage.water.gardening = Some("no".into());
        usage.water.garden_size = Some("large".into());
        assert!(detect(&usage).is_empty());
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let thresholds = RuleThresholds {
            ac_max_age_years: 5.0,
            ..Default::default()
        };
        let mut usage = UsageAnswers::default();
        usage.electricity.ac_age = Some(6.0);
        let found = detect_findings(&thresholds, &usage);
        assert_eq!(found, vec![Finding::AcAge {
                age: Some(6.0.into())
            }]);
    }

    #[test]
    fn test_cause_tag_roundtrip_and_unknown() {
        let tag: CauseTag = serde_json::from_str("\"TOILET_FLUSH\"").unwrap();
        assert_eq!(tag, CauseTag::Known(Cause::ToiletFlush));
        let tag: CauseTag = serde_json::from_str("\"SOLAR_PANEL\"").unwrap();
        assert_eq!(tag, CauseTag::Unrecognized("SOLAR_PANEL".into()));
        assert_eq!(serde_json::to_string(&tag).unwrap(), "\"SOLAR_PANEL\"");
    }

    #[test]
    fn test_inefficiency_wire_shape() {
        let i = Inefficiency::from(Finding::GardeningWatering {
            size: Some("large".into()),
        });
        let json = serde_json::to_value(&i).unwrap();
        assert_eq!(json["cause"], "GARDENING_WATERING");
        assert_eq!(json["severity"], "Low");
        assert_eq!(json["data"]["size"], "large");

        let shower = serde_json::to_value(Inefficiency::from(Finding::ShowerFlow)).unwrap();
        assert!(shower.get("data").is_none());
    }

    #[test]
    fn test_evidence_keeps_text_readings() {
        let i: Inefficiency = serde_json::from_str(
            r#"{"cause": "GEYSER_RATING", "severity": "Medium", "data": {"rating": "two", "age": "9"}}"#,
        )
        .unwrap();
        assert_eq!(i.data.rating, Some(Reading::Text("two".into())));
        assert_eq!(i.data.age.as_ref().and_then(Reading::as_number), Some(9.0));

        let finding = Finding::from_inefficiency(&i).unwrap();
        assert_eq!(finding.placeholders(), vec![("rating", "two".to_string())]);

        let blank: Inefficiency =
            serde_json::from_str(r#"{"cause": "AC_AGE", "severity": "High", "data": {"age": " "}}"#)
                .unwrap();
        assert!(blank.data.age.is_none());
        assert_eq!(serde_json::to_value(&i).unwrap()["data"]["age"], 9.0);
    }

    #[test]
    fn test_finding_from_unrecognized_is_none() {
        let i = Inefficiency {
            cause: CauseTag::Unrecognized("MYSTERY".into()),
            severity: Severity::High,
            data: Evidence::default(),
        };
        assert!(Finding::from_inefficiency(&i).is_none());
    }

    #[test]
    fn test_categories_and_utilities() {
        assert_eq!(Cause::RefrigeratorAge.category(), Category::Refrigerator);
        assert_eq!(Cause::LightingType.utility(), Utility::Electricity);
        assert_eq!(Cause::GardeningWatering.utility(), Utility::Water);
        for cause in Cause::all() {
            assert_eq!(Cause::from_tag(cause.tag()), Some(*cause));
        }
    }
}
