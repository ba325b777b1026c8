//! Household profile — where the household is and how many people live there.

use serde::{Deserialize, Deserializer, Serialize};

use crate::lenient;

/// Tariff region. Anything unrecognised is billed at the `Other` rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    Delhi,
    Mumbai,
    Karnataka,
    TamilNadu,
    #[default]
    Other,
}

impl Region {
    pub fn all() -> &'static [Region] {
        &[
            Self::Delhi,
            Self::Mumbai,
            Self::Karnataka,
            Self::TamilNadu,
            Self::Other,
        ]
    }

    /// Parse a region name, accepting `TAMIL_NADU`, `tamil nadu` and `Tamil-Nadu` alike.
    pub fn from_name(name: &str) -> Self {
        let normalized: String = name
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        match normalized.as_str() {
            "DELHI" => Self::Delhi,
            "MUMBAI" => Self::Mumbai,
            "KARNATAKA" => Self::Karnataka,
            "TAMIL_NADU" => Self::TamilNadu,
            _ => Self::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Delhi => "Delhi",
            Self::Mumbai => "Mumbai",
            Self::Karnataka => "Karnataka",
            Self::TamilNadu => "Tamil Nadu",
            Self::Other => "Other",
        }
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(lenient::text(deserializer)?
            .map(|name| Region::from_name(&name))
            .unwrap_or_default())
    }
}

/// Who the estimate is for. Fixed for the duration of a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub region: Region,
    #[serde(default = "default_residents", deserialize_with = "residents")]
    pub residents: u32,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            region: Region::Other,
            residents: 1,
        }
    }
}

impl Profile {
    pub fn new(region: Region, residents: u32) -> Self {
        Self {
            region,
            residents: residents.max(1),
        }
    }

    /// Resident count used for per-person figures. Never zero.
    pub fn occupancy(&self) -> f64 {
        self.residents.max(1) as f64
    }
}

fn default_residents() -> u32 {
    1
}

/// Integer part of the answer; missing, non-numeric or non-positive counts become 1.
fn residents<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let count = lenient::number(deserializer)?
        .map(f64::trunc)
        .filter(|n| *n >= 1.0)
        .map(|n| n.min(u32::MAX as f64) as u32);
    Ok(count.unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_from_name() {
        assert_eq!(Region::from_name("DELHI"), Region::Delhi);
        assert_eq!(Region::from_name("mumbai"), Region::Mumbai);
        assert_eq!(Region::from_name("Tamil Nadu"), Region::TamilNadu);
        assert_eq!(Region::from_name("TAMIL_NADU"), Region::TamilNadu);
        assert_eq!(Region::from_name("GOA"), Region::Other);
        assert_eq!(Region::from_name(""), Region::Other);
    }

    #[test]
    fn test_region_lookup_ignores_case_and_separators() {
        // Deliberately looser than an exact-key lookup: hand-typed names
        // are billed at their region's rate, not the fallback.
        for name in ["delhi", " Delhi ", "DeLhI"] {
            assert_eq!(Region::from_name(name), Region::Delhi, "{}", name);
        }
        for name in ["tamil nadu", "Tamil-Nadu", "tamil_nadu"] {
            assert_eq!(Region::from_name(name), Region::TamilNadu, "{}", name);
        }
        // Still no fuzzy matching beyond that.
        assert_eq!(Region::from_name("TAMILNADU"), Region::Other);
        assert_eq!(Region::from_name("New Delhi"), Region::Other);

        let p: Profile = serde_json::from_str(r#"{"region": "delhi"}"#).unwrap();
        assert_eq!(p.region, Region::Delhi);
    }

    #[test]
    fn test_profile_parses_form_strings() {
        let p: Profile = serde_json::from_str(r#"{"region": "KARNATAKA", "residents": "4"}"#).unwrap();
        assert_eq!(p.region, Region::Karnataka);
        assert_eq!(p.residents, 4);
    }

    #[test]
    fn test_residents_truncates_fractional_answers() {
        let p: Profile = serde_json::from_str(r#"{"residents": "3.7"}"#).unwrap();
        assert_eq!(p.residents, 3);
    }

    #[test]
    fn test_residents_default_to_one() {
        for json in [
            r#"{}"#,
            r#"{"residents": ""}"#,
            r#"{"residents": "many"}"#,
            r#"{"residents": 0}"#,
            r#"{"residents": -2}"#,
            r#"{"residents": null}"#,
        ] {
            let p: Profile = serde_json::from_str(json).unwrap();
            assert_eq!(p.residents, 1, "input {}", json);
            assert_eq!(p.region, Region::Other);
        }
    }

    #[test]
    fn test_profile_ignores_extra_fields() {
        let p: Profile =
            serde_json::from_str(r#"{"region": "DELHI", "residents": 2, "cityType": "metro"}"#)
                .unwrap();
        assert_eq!(p, Profile::new(Region::Delhi, 2));
    }

    #[test]
    fn test_region_serializes_to_wire_name() {
        let json = serde_json::to_string(&Region::TamilNadu).unwrap();
        assert_eq!(json, "\"TAMIL_NADU\"");
    }

    #[test]
    fn test_occupancy_never_zero() {
        let p = Profile {
            region: Region::Other,
            residents: 0,
        };
        assert_eq!(p.occupancy(), 1.0);
    }
}
