//! Efficiency tiers — per-person usage bucketed into four fixed bands.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EfficiencyTier {
    Efficient,
    Moderate,
    Inefficient,
    #[serde(rename = "Highly Inefficient")]
    HighlyInefficient,
}

impl EfficiencyTier {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Efficient => "Efficient",
            Self::Moderate => "Moderate",
            Self::Inefficient => "Inefficient",
            Self::HighlyInefficient => "Highly Inefficient",
        }
    }
}

impl std::fmt::Display for EfficiencyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive upper bounds of the first three tiers; anything above
/// `inefficient` is highly inefficient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierBands {
    pub efficient: f64,
    pub moderate: f64,
    pub inefficient: f64,
}

impl TierBands {
    /// kWh per person per month.
    pub const ELECTRICITY: TierBands = TierBands {
        efficient: 120.0,
        moderate: 200.0,
        inefficient: 300.0,
    };

    /// Liters per person per day.
    pub const WATER: TierBands = TierBands {
        efficient: 135.0,
        moderate: 180.0,
        inefficient: 250.0,
    };

    pub fn classify(&self, per_person: f64) -> EfficiencyTier {
        if per_person <= self.efficient {
            EfficiencyTier::Efficient
        } else if per_person <= self.moderate {
            EfficiencyTier::Moderate
        } else if per_person <= self.inefficient {
            EfficiencyTier::Inefficient
        } else {
            EfficiencyTier::HighlyInefficient
        }
    }

    pub fn is_ascending(&self) -> bool {
        self.efficient < self.moderate && self.moderate < self.inefficient
    }
}

/// Band sets for both utilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EfficiencyBands {
    pub electricity: TierBands,
    pub water: TierBands,
}

impl Default for EfficiencyBands {
    fn default() -> Self {
        Self {
            electricity: TierBands::ELECTRICITY,
            water: TierBands::WATER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_electricity_boundaries_inclusive() {
        let b = TierBands::ELECTRICITY;
        assert_eq!(b.classify(0.0), EfficiencyTier::Efficient);
        assert_eq!(b.classify(120.0), EfficiencyTier::Efficient);
        assert_eq!(b.classify(120.01), EfficiencyTier::Moderate);
        assert_eq!(b.classify(150.0), EfficiencyTier::Moderate);
        assert_eq!(b.classify(200.0), EfficiencyTier::Moderate);
        assert_eq!(b.classify(300.0), EfficiencyTier::Inefficient);
        assert_eq!(b.classify(300.01), EfficiencyTier::HighlyInefficient);
    }

    #[test]
    fn test_water_boundaries_inclusive() {
        let b = TierBands::WATER;
        assert_eq!(b.classify(135.0), EfficiencyTier::Efficient);
        assert_eq!(b.classify(135.5), EfficiencyTier::Moderate);
        assert_eq!(b.classify(180.0), EfficiencyTier::Moderate);
        assert_eq!(b.classify(250.0), EfficiencyTier::Inefficient);
        assert_eq!(b.classify(251.0), EfficiencyTier::HighlyInefficient);
    }

    #[test]
    fn test_tiers_are_ordered() {
        assert!(EfficiencyTier::Efficient < EfficiencyTier::Moderate);
        assert!(EfficiencyTier::Inefficient < EfficiencyTier::HighlyInefficient);
    }

    #[test]
    fn test_highly_inefficient_wire_label() {
        let json = serde_json::to_string(&EfficiencyTier::HighlyInefficient).unwrap();
        assert_eq!(json, "\"Highly Inefficient\"");
        let back: EfficiencyTier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EfficiencyTier::HighlyInefficient);
    }

    #[test]
    fn test_default_bands_ascending() {
        assert!(TierBands::ELECTRICITY.is_ascending());
        assert!(TierBands::WATER.is_ascending());
        let bad = TierBands {
            efficient: 200.0,
            moderate: 100.0,
            inefficient: 300.0,
        };
        assert!(!bad.is_ascending());
    }
}
