//! Regional utility tariffs.

use serde::{Deserialize, Serialize};

use crate::profile::Region;

/// Price per unit for one utility, one row per region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct TariffTable {
    pub delhi: f64,
    pub mumbai: f64,
    pub karnataka: f64,
    pub tamil_nadu: f64,
    pub other: f64,
}

impl TariffTable {
    pub fn rate(&self, region: Region) -> f64 {
        match region {
            Region::Delhi => self.delhi,
            Region::Mumbai => self.mumbai,
            Region::Karnataka => self.karnataka,
            Region::TamilNadu => self.tamil_nadu,
            Region::Other => self.other,
        }
    }
}

/// Electricity is priced per kWh, water per 1000 liters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tariffs {
    pub electricity: TariffTable,
    pub water: TariffTable,
}

impl Default for Tariffs {
    fn default() -> Self {
        Self {
            electricity: TariffTable {
                delhi: 8.0,
                mumbai: 10.0,
                karnataka: 7.0,
                tamil_nadu: 6.0,
                other: 7.5,
            },
            water: TariffTable {
                delhi: 4.0,
                mumbai: 5.0,
                karnataka: 3.0,
                tamil_nadu: 2.0,
                other: 3.5,
            },
        }
    }
}

impl Tariffs {
    /// Monthly electricity bill for a monthly kWh figure.
    pub fn electricity_cost(&self, region: Region, kwh_per_month: f64) -> f64 {
        kwh_per_month * self.electricity.rate(region)
    }

    /// Monthly water bill for a *daily* liters figure.
    pub fn water_cost(&self, region: Region, liters_per_day: f64) -> f64 {
        liters_per_day * 30.0 / 1000.0 * self.water.rate(region)
    }

    /// Problems with the tables, empty if usable.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (utility, table) in [("electricity", &self.electricity), ("water", &self.water)] {
            for &region in Region::all() {
                let rate = table.rate(region);
                if !rate.is_finite() || rate < 0.0 {
                    problems.push(format!(
                        "{} tariff for {} is invalid: {}",
                        utility,
                        region.label(),
                        rate
                    ));
                }
            }
        }
        problems
    }
}
