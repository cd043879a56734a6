//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting and simulation
//! - exported to JSON for external plotting
//! - echoed back in terminal reports

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One specific-gravity reading at an elapsed time since pitching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSample {
    /// Elapsed time in days (first sample is always day 0).
    pub time_days: f64,
    /// Specific gravity relative to water (e.g. `1.090`).
    pub sg: f64,
}

/// The validated set of measurements for one estimation request.
///
/// Sample count is part of the type, not an array length to inspect:
/// two readings fit the basic Monod model, three readings additionally
/// identify a biomass decay rate and switch to the decay variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MeasurementSet {
    Pair([MeasurementSample; 2]),
    Triple([MeasurementSample; 3]),
}

impl MeasurementSet {
    /// Build a set from raw samples.
    ///
    /// Samples are sorted by time. Construction fails unless every field is
    /// finite, exactly 2 or 3 samples are given, the earliest time is 0, all
    /// gravities are positive, and times are strictly increasing (duplicate
    /// times would make the fit ill-posed).
    pub fn from_samples(samples: &[MeasurementSample]) -> Result<Self, AppError> {
        for s in samples {
            if !(s.time_days.is_finite() && s.sg.is_finite()) {
                return Err(AppError::invalid_input(
                    "Measurement samples must be finite numbers.",
                ));
            }
            if s.time_days < 0.0 {
                return Err(AppError::invalid_input("Sample times must be >= 0 days."));
            }
            if s.sg <= 0.0 {
                return Err(AppError::invalid_input("Specific gravity must be > 0."));
            }
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| {
            a.time_days
                .partial_cmp(&b.time_days)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if let Some(first) = sorted.first() {
            if first.time_days != 0.0 {
                return Err(AppError::invalid_input(
                    "The first sample must be taken at day 0 (fermentation start).",
                ));
            }
        }
        for w in sorted.windows(2) {
            if w[1].time_days - w[0].time_days < 1e-9 {
                return Err(AppError::invalid_input(
                    "Sample times must be strictly increasing (no duplicate days).",
                ));
            }
        }

        match sorted.len() {
            2 => Ok(MeasurementSet::Pair([sorted[0], sorted[1]])),
            3 => Ok(MeasurementSet::Triple([sorted[0], sorted[1], sorted[2]])),
            n => Err(AppError::invalid_input(format!(
                "Expected 2 or 3 samples, got {n}."
            ))),
        }
    }

    /// Samples in time order.
    pub fn samples(&self) -> &[MeasurementSample] {
        match self {
            MeasurementSet::Pair(s) => s,
            MeasurementSet::Triple(s) => s,
        }
    }

    /// Measured times, in order.
    pub fn times(&self) -> Vec<f64> {
        self.samples().iter().map(|s| s.time_days).collect()
    }

    /// Original gravity: the day-0 reading.
    pub fn og(&self) -> f64 {
        self.samples()[0].sg
    }

    /// Largest measured gravity (the logistic fitter's empirical upper asymptote).
    pub fn sg_max(&self) -> f64 {
        self.samples()
            .iter()
            .map(|s| s.sg)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Time of the last sample.
    pub fn t_max(&self) -> f64 {
        self.samples()
            .last()
            .map(|s| s.time_days)
            .unwrap_or(0.0)
    }

    /// Which Monod variant this measurement set identifies.
    pub fn variant(&self) -> MonodVariant {
        match self {
            MeasurementSet::Pair(_) => MonodVariant::Basic,
            MeasurementSet::Triple(_) => MonodVariant::Decay,
        }
    }
}

/// Monod model variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonodVariant {
    /// `dX = mu(S)·X`, `dS = -dX/Yxs`.
    Basic,
    /// `dX = (mu(S) - kd)·X`, `dS = -(mu(S)·X)/Yxs` (uptake tied to gross growth).
    Decay,
}

impl MonodVariant {
    pub fn display_name(self) -> &'static str {
        match self {
            MonodVariant::Basic => "Monod",
            MonodVariant::Decay => "Monod + decay",
        }
    }
}

/// Fitted parameters of the empirical logistic SG(t) shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticFitParams {
    /// Steepness (1/day).
    pub k: f64,
    /// Inflection time (days).
    pub t0: f64,
}

/// Fitted Monod kinetic parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonodFitParams {
    /// Maximum specific growth rate (1/day).
    pub mu_max: f64,
    /// Half-saturation constant (g/L).
    pub ks: f64,
    /// Biomass decay rate (1/day); present only for three-sample fits.
    pub kd: Option<f64>,
}

/// Monod fit plus its goodness and the variant it was fitted under.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonodFit {
    pub params: MonodFitParams,
    pub variant: MonodVariant,
    /// Weighted SSE in SG space at the fitted optimum.
    pub sse: f64,
}

/// Integrated biomass/substrate trajectories over a shared time grid.
///
/// Invariant: `x[i] >= 0` and `s[i] >= 0` for every node, regardless of
/// numerical overshoot inside an integration step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationTrace {
    /// Time grid (days), sorted ascending.
    pub t: Vec<f64>,
    /// Biomass concentration (g/L).
    pub x: Vec<f64>,
    /// Substrate (dissolved sugar) mass (g).
    pub s: Vec<f64>,
}

/// Logistic display series over the evaluation grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticSeries {
    pub t: Vec<f64>,
    pub sg: Vec<f64>,
    pub abv: Vec<f64>,
}

/// Mechanistic display series over the evaluation grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonodSeries {
    pub t: Vec<f64>,
    pub sg: Vec<f64>,
    /// Biomass concentration (g/L).
    pub biomass: Vec<f64>,
    pub abv: Vec<f64>,
}

/// Point prediction at one elapsed time, interpolated from the Monod series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointPrediction {
    pub time_days: f64,
    pub sg: f64,
    pub abv: f64,
    /// Biomass concentration (g/L).
    pub biomass: f64,
}

/// Which ABV-from-gravity formula family to use.
///
/// Two historically incompatible conventions exist; call sites select one via
/// configuration instead of hard-coding a formula, so every computed ABV in a
/// run uses the same convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AbvMethod {
    /// HMRC-style rational formula on SG (the canonical default).
    Hmrc,
    /// Balling attenuation on degrees Plato derived from the SG cubic.
    Plato,
}

/// Calendar-duration breakdown between two timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationBreakdown {
    /// True when end preceded start and the two were swapped.
    pub swapped: bool,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub total_days: f64,
    pub total_hours: f64,
    pub total_minutes: f64,
    pub total_seconds: f64,
}

/// Search-budget knobs for both fitters.
///
/// Grid resolutions and refinement trial counts are configuration, not
/// constants baked into the algorithms, and the RNG seed makes the randomized
/// refinement reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Log-spaced steps over the logistic `k` range.
    pub logistic_k_steps: usize,
    /// Linear steps over the logistic `t0` range.
    pub logistic_t0_steps: usize,
    /// Randomized refinement trials for the logistic fit.
    pub logistic_refine_trials: usize,
    /// Grid steps per axis for the Monod parameter box (2-D or 3-D).
    pub monod_grid_steps: usize,
    /// Randomized refinement trials for the Monod fit.
    pub monod_refine_trials: usize,
    /// RNG seed shared by both refinements.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            logistic_k_steps: 60,
            logistic_t0_steps: 80,
            logistic_refine_trials: 400,
            monod_grid_steps: 20,
            monod_refine_trials: 300,
            seed: 42,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// Batch volume (L), > 0.
    pub volume_l: f64,
    /// Pitched yeast mass (g), >= 0.
    pub yeast_mass_g: f64,
    /// Prediction horizon (days), >= last sample time.
    pub predict_end_days: f64,
    /// ABV formula convention for every ABV in this run.
    pub abv_method: AbvMethod,
    /// Lower SG asymptote/floor (slightly above pure water would reject
    /// ordinary measurement noise, so the default sits exactly at 1.0).
    pub sg_min: f64,
    /// Display ceiling for the logistic SG curve.
    pub sg_ceiling: f64,
    /// Residual weight multiplier for the most recent sample.
    pub recency_weight: f64,
    /// RK4 step (days) for fitting-time simulations.
    pub sim_dt_days: f64,
    /// Uniform node count of the evaluation grid.
    pub grid_points: usize,
    /// Optional ad-hoc query time (days) answered by interpolation.
    pub query_time_days: Option<f64>,
    pub search: SearchConfig,
}

impl ForecastConfig {
    /// Defaults for everything except the physical inputs.
    pub fn new(volume_l: f64, yeast_mass_g: f64, predict_end_days: f64) -> Self {
        Self {
            volume_l,
            yeast_mass_g,
            predict_end_days,
            abv_method: AbvMethod::Hmrc,
            sg_min: 1.0,
            sg_ceiling: 1.5,
            recency_weight: 20.0,
            sim_dt_days: 0.05,
            grid_points: 400,
            query_time_days: None,
            search: SearchConfig::default(),
        }
    }

    /// Validate the physical/numeric fields against the input contract.
    pub fn validate(&self, set: &MeasurementSet) -> Result<(), AppError> {
        let finite = [
            self.volume_l,
            self.yeast_mass_g,
            self.predict_end_days,
            self.sg_min,
            self.sg_ceiling,
            self.recency_weight,
            self.sim_dt_days,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(AppError::invalid_input(
                "Forecast configuration contains non-finite numbers.",
            ));
        }
        if self.volume_l <= 0.0 {
            return Err(AppError::invalid_input("Batch volume must be > 0 L."));
        }
        if self.yeast_mass_g < 0.0 {
            return Err(AppError::invalid_input("Yeast mass must be >= 0 g."));
        }
        if self.predict_end_days < set.t_max() {
            return Err(AppError::invalid_input(
                "Prediction horizon must reach at least the last sample time.",
            ));
        }
        if self.sim_dt_days <= 0.0 {
            return Err(AppError::invalid_input("Simulation step must be > 0 days."));
        }
        if self.recency_weight < 1.0 {
            return Err(AppError::invalid_input("Recency weight must be >= 1."));
        }
        if let Some(q) = self.query_time_days {
            if !q.is_finite() || q < 0.0 {
                return Err(AppError::invalid_input(
                    "Query time must be a finite number of days >= 0.",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(t: f64, sg: f64) -> MeasurementSample {
        MeasurementSample {
            time_days: t,
            sg,
        }
    }

    #[test]
    fn set_sorts_and_tags_by_count() {
        let set =
            MeasurementSet::from_samples(&[sample(3.0, 1.060), sample(0.0, 1.100)]).unwrap();
        assert!(matches!(set, MeasurementSet::Pair(_)));
        assert_eq!(set.times(), vec![0.0, 3.0]);
        assert_eq!(set.variant(), MonodVariant::Basic);

        let set = MeasurementSet::from_samples(&[
            sample(5.0, 1.020),
            sample(0.0, 1.100),
            sample(2.0, 1.060),
        ])
        .unwrap();
        assert!(matches!(set, MeasurementSet::Triple(_)));
        assert_eq!(set.variant(), MonodVariant::Decay);
        assert!((set.og() - 1.100).abs() < 1e-12);
        assert!((set.sg_max() - 1.100).abs() < 1e-12);
        assert!((set.t_max() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn set_rejects_bad_inputs() {
        assert!(MeasurementSet::from_samples(&[sample(0.0, 1.1)]).is_err());
        assert!(
            MeasurementSet::from_samples(&[sample(1.0, 1.1), sample(3.0, 1.05)]).is_err(),
            "first sample must be at day 0"
        );
        assert!(
            MeasurementSet::from_samples(&[sample(0.0, 1.1), sample(0.0, 1.05)]).is_err(),
            "duplicate times are ill-posed"
        );
        assert!(
            MeasurementSet::from_samples(&[sample(0.0, f64::NAN), sample(3.0, 1.05)]).is_err()
        );
        assert!(MeasurementSet::from_samples(&[
            sample(0.0, 1.1),
            sample(1.0, 1.08),
            sample(2.0, 1.06),
        ])
        .is_ok());
    }

    #[test]
    fn config_validation_catches_contract_violations() {
        let set =
            MeasurementSet::from_samples(&[sample(0.0, 1.100), sample(3.0, 1.060)]).unwrap();

        let good = ForecastConfig::new(20.0, 5.0, 14.0);
        assert!(good.validate(&set).is_ok());

        let mut bad = good.clone();
        bad.volume_l = 0.0;
        assert!(bad.validate(&set).is_err());

        let mut bad = good.clone();
        bad.predict_end_days = 2.0;
        assert!(bad.validate(&set).is_err(), "horizon before last sample");

        let mut bad = good.clone();
        bad.yeast_mass_g = f64::INFINITY;
        assert!(bad.validate(&set).is_err());

        let mut bad = good;
        bad.query_time_days = Some(-1.0);
        assert!(bad.validate(&set).is_err());
    }
}
