//! Location-Based Multi-Hazard Risk Pipeline
//!
//! One coordinate pair plus a timestamp in, four calibrated disaster-risk
//! probabilities out:
//!
//! ```text
//! Location ──> GeoContext ──> FeatureVector ──> raw probability ──> calibrated probability
//!              (atlas)        (estimator)       (model registry)    (calibrator)
//! ```
//!
//! The forecast generator wraps the chain in a fixed-size loop over future
//! days, substituting each day's month and day into the seasonal rules.
//! The atlas and model registry are built once at startup and borrowed
//! read-only by every request; requests share no mutable state.

use chrono::{DateTime, Duration, Utc};
use geo_context::{GeoAtlas, GeoContext, GeoError, Location};
use hazard_models::{Hazard, ModelError, ModelRegistry};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod calibrator;
pub mod cities;
pub mod estimator;
pub mod forecast;

pub use estimator::FeatureVector;
pub use forecast::{DailyOutlook, ForecastSeries, DEFAULT_HORIZON_DAYS};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Geo(#[from] GeoError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("forecast horizon must be at least 1 day, got {0}")]
    InvalidHorizon(u32),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Calibrated probability above which a day or hazard is flagged high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 0.60;

/// Calibrated probability above which risk is reported as moderate.
pub const MODERATE_RISK_THRESHOLD: f64 = 0.30;

/// Coarse risk classification of a calibrated probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_probability(p: f64) -> Self {
        if p > HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if p > MODERATE_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Raw and calibrated probability for one hazard. Transient: produced and
/// consumed within one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskEstimate {
    pub hazard: Hazard,
    pub raw_probability: f64,
    pub calibrated_probability: f64,
}

impl RiskEstimate {
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_probability(self.calibrated_probability)
    }
}

/// Full result of one assessment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub location: Location,
    pub generated_at: DateTime<Utc>,
    pub context: GeoContext,
    pub estimates: Vec<RiskEstimate>,
}

impl AssessmentReport {
    pub fn estimate(&self, hazard: Hazard) -> Option<&RiskEstimate> {
        self.estimates.iter().find(|e| e.hazard == hazard)
    }

    /// Highest calibrated probability across the four hazards.
    pub fn max_calibrated(&self) -> f64 {
        self.estimates
            .iter()
            .map(|e| e.calibrated_probability)
            .fold(0.0, f64::max)
    }
}

/// The per-request pipeline driver.
///
/// Borrows the startup-constructed atlas and registry immutably; a single
/// instance serves any number of sequential requests.
pub struct RiskPipeline<'a> {
    atlas: &'a GeoAtlas,
    registry: &'a ModelRegistry,
}

impl<'a> RiskPipeline<'a> {
    pub fn new(atlas: &'a GeoAtlas, registry: &'a ModelRegistry) -> Self {
        Self { atlas, registry }
    }

    /// Geographic context for a location.
    pub fn context(&self, location: &Location) -> GeoContext {
        self.atlas.context(location)
    }

    /// Run estimate → predict → calibrate for all four hazards at one
    /// timestamp.
    pub fn assess(
        &self,
        location: &Location,
        when: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> Result<AssessmentReport> {
        let context = self.atlas.context(location);
        let estimates = self.estimates_at(location, &context, when, rng)?;

        Ok(AssessmentReport {
            location: *location,
            generated_at: when,
            context,
            estimates,
        })
    }

    /// Re-run the assessment chain for each of the next `horizon_days`
    /// days after `start`. The context is derived once; it is a pure
    /// function of the location and does not change day-to-day.
    pub fn forecast(
        &self,
        location: &Location,
        start: DateTime<Utc>,
        horizon_days: u32,
        rng: &mut impl Rng,
    ) -> Result<ForecastSeries> {
        if horizon_days == 0 {
            return Err(PipelineError::InvalidHorizon(horizon_days));
        }

        let context = self.atlas.context(location);
        let mut days = Vec::with_capacity(horizon_days as usize);

        for offset in 1..=i64::from(horizon_days) {
            let when = start + Duration::days(offset);
            let estimates = self.estimates_at(location, &context, when, rng)?;
            days.push(DailyOutlook::new(when.date_naive(), estimates));
        }

        Ok(ForecastSeries { horizon_days, days })
    }

    fn estimates_at(
        &self,
        location: &Location,
        context: &GeoContext,
        when: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> Result<Vec<RiskEstimate>> {
        let mut estimates = Vec::with_capacity(Hazard::ALL.len());

        for hazard in Hazard::ALL {
            let vector = estimator::for_hazard(hazard, location, context, when, rng);
            let model = self.registry.get(hazard)?;
            let raw = model.predict_probability(vector.values())?;
            let calibrated = calibrator::calibrate(hazard, raw, context);

            debug!(
                "{} at {}: raw={:.3} calibrated={:.3}",
                hazard, location, raw, calibrated
            );

            estimates.push(RiskEstimate {
                hazard,
                raw_probability: raw,
                calibrated_probability: calibrated,
            });
        }

        Ok(estimates)
    }
}
