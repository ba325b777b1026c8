//! Progress tracking — compare a later assessment against a baseline.

use serde::{Deserialize, Serialize};

use crate::estimator::{round2, ConsumptionResult, UtilitySummary};

/// Change in one utility between two assessments. Positive means less usage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilityProgress {
    pub baseline: f64,
    pub current: f64,
    pub improvement: f64,
    pub improvement_percent: f64,
    pub cost_saving: f64,
}

impl UtilityProgress {
    fn between(baseline: &UtilitySummary, current: &UtilitySummary) -> Self {
        let improvement = baseline.total - current.total;
        let improvement_percent = if baseline.total == 0.0 {
            0.0
        } else {
            improvement / baseline.total * 100.0
        };
        Self {
            baseline: baseline.total,
            current: current.total,
            improvement: round2(improvement),
            improvement_percent: round2(improvement_percent),
            cost_saving: round2(baseline.cost - current.cost),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub electricity: UtilityProgress,
    pub water: UtilityProgress,
}

pub fn compare_progress(baseline: &ConsumptionResult, current: &ConsumptionResult) -> ProgressReport {
    ProgressReport {
        electricity: UtilityProgress::between(&baseline.electricity, &current.electricity),
        water: UtilityProgress::between(&baseline.water, &current.water),
    }
}

/// A household's baseline and most recent assessment. The first recorded
/// result becomes the baseline; every later one replaces `current`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<ConsumptionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<ConsumptionResult>,
}

impl ProgressLog {
    pub fn record(&mut self, result: ConsumptionResult) {
        if self.baseline.is_none() {
            self.baseline = Some(result);
        } else {
            self.current = Some(result);
        }
    }

    /// `None` until a baseline exists. With only a baseline, it is compared
    /// against itself.
    pub fn report(&self) -> Option<ProgressReport> {
        let baseline = self.baseline.as_ref()?;
        let current = self.current.as_ref().unwrap_or(baseline);
        Some(compare_progress(baseline, current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::efficiency::EfficiencyTier;

    fn result(electricity: f64, e_cost: f64, water: f64, w_cost: f64) -> ConsumptionResult {
        ConsumptionResult {
            electricity: UtilitySummary {
                total: electricity,
                per_person: electricity,
                efficiency: EfficiencyTier::Moderate,
                cost: e_cost,
            },
            water: UtilitySummary {
                total: water,
                per_person: water,
                efficiency: EfficiencyTier::Efficient,
                cost: w_cost,
            },
        }
    }

    #[test]
    fn test_improvement_and_percent() {
        let before = result(200.0, 1600.0, 400.0, 48.0);
        let after = result(150.0, 1200.0, 300.0, 36.0);
        let report = compare_progress(&before, &after);
        assert_eq!(report.electricity.improvement, 50.0);
        assert_eq!(report.electricity.improvement_percent, 25.0);
        assert_eq!(report.electricity.cost_saving, 400.0);
        assert_eq!(report.water.improvement, 100.0);
        assert_eq!(report.water.improvement_percent, 25.0);
        assert_eq!(report.water.cost_saving, 12.0);
    }

    #[test]
    fn test_regression_is_negative() {
        let before = result(100.0, 800.0, 100.0, 12.0);
        let after = result(120.0, 960.0, 100.0, 12.0);
        let report = compare_progress(&before, &after);
        assert_eq!(report.electricity.improvement, -20.0);
        assert_eq!(report.electricity.improvement_percent, -20.0);
        assert_eq!(report.electricity.cost_saving, -160.0);
    }

    #[test]
    fn test_zero_baseline_has_zero_percent() {
        let before = result(0.0, 0.0, 0.0, 0.0);
        let after = result(10.0, 80.0, 5.0, 1.0);
        let report = compare_progress(&before, &after);
        assert_eq!(report.electricity.improvement_percent, 0.0);
        assert_eq!(report.water.improvement, -5.0);
    }

    #[test]
    fn test_log_baseline_then_current() {
        let mut log = ProgressLog::default();
        assert!(log.report().is_none());

        log.record(result(200.0, 1600.0, 400.0, 48.0));
        let report = log.report().unwrap();
        assert_eq!(report.electricity.improvement, 0.0);
        assert_eq!(report.water.cost_saving, 0.0);

        log.record(result(180.0, 1440.0, 400.0, 48.0));
        log.record(result(160.0, 1280.0, 380.0, 45.6));
        assert_eq!(log.baseline.unwrap().electricity.total, 200.0);
        let report = log.report().unwrap();
        assert_eq!(report.electricity.improvement, 40.0);
        assert_eq!(report.water.improvement, 20.0);
        assert_eq!(report.water.improvement_percent, 5.0);
    }
}
