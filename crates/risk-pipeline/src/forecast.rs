//! Forecast series
//!
//! One outlook per future day, produced by re-running the full
//! estimate → predict → calibrate chain with that day's month and day
//! substituted into the seasonal rules. Days are independent of each
//! other; the series length always equals the requested horizon.

use crate::{RiskEstimate, RiskLevel, HIGH_RISK_THRESHOLD};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default forecast horizon in days.
pub const DEFAULT_HORIZON_DAYS: u32 = 7;

/// Calibrated estimates for one forecast day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyOutlook {
    pub date: NaiveDate,
    pub estimates: Vec<RiskEstimate>,
    /// Highest calibrated probability across the four hazards.
    pub max_calibrated: f64,
    pub risk_level: RiskLevel,
}

impl DailyOutlook {
    pub fn new(date: NaiveDate, estimates: Vec<RiskEstimate>) -> Self {
        let max_calibrated = estimates
            .iter()
            .map(|e| e.calibrated_probability)
            .fold(0.0, f64::max);
        Self {
            date,
            estimates,
            max_calibrated,
            risk_level: RiskLevel::from_probability(max_calibrated),
        }
    }

    /// True when any hazard's calibrated probability exceeds the
    /// high-risk threshold.
    pub fn is_high_risk(&self) -> bool {
        self.max_calibrated > HIGH_RISK_THRESHOLD
    }
}

/// Ordered forecast outlooks, one per day of the horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub horizon_days: u32,
    pub days: Vec<DailyOutlook>,
}

impl ForecastSeries {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn high_risk_days(&self) -> impl Iterator<Item = &DailyOutlook> {
        self.days.iter().filter(|d| d.is_high_risk())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hazard_models::Hazard;

    fn estimate(hazard: Hazard, calibrated: f64) -> RiskEstimate {
        RiskEstimate {
            hazard,
            raw_probability: calibrated,
            calibrated_probability: calibrated,
        }
    }

    #[test]
    fn test_outlook_max_and_level() {
        let outlook = DailyOutlook::new(
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            vec![
                estimate(Hazard::Flood, 0.2),
                estimate(Hazard::Cyclone, 0.7),
                estimate(Hazard::Fire, 0.1),
            ],
        );

        assert_eq!(outlook.max_calibrated, 0.7);
        assert_eq!(outlook.risk_level, RiskLevel::High);
        assert!(outlook.is_high_risk());
    }

    #[test]
    fn test_threshold_is_strict() {
        let outlook = DailyOutlook::new(
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            vec![estimate(Hazard::Flood, HIGH_RISK_THRESHOLD)],
        );
        assert!(!outlook.is_high_risk(), "exactly at threshold is not high");
    }

    #[test]
    fn test_high_risk_days_filter() {
        let series = ForecastSeries {
            horizon_days: 3,
            days: vec![
                DailyOutlook::new(
                    NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
                    vec![estimate(Hazard::Flood, 0.2)],
                ),
                DailyOutlook::new(
                    NaiveDate::from_ymd_opt(2025, 7, 2).unwrap(),
                    vec![estimate(Hazard::Earthquake, 0.8)],
                ),
                DailyOutlook::new(
                    NaiveDate::from_ymd_opt(2025, 7, 3).unwrap(),
                    vec![estimate(Hazard::Fire, 0.5)],
                ),
            ],
        };

        let high: Vec<_> = series.high_risk_days().collect();
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].date, NaiveDate::from_ymd_opt(2025, 7, 2).unwrap());
    }
}
