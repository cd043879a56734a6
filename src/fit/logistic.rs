//! Empirical logistic SG(t) shape fit.
//!
//! `sg(t) = sg_min + (sg_max - sg_min) / (1 + exp(-k·(t - t0)))`
//!
//! `sg_max` is the largest *measured* gravity (the empirical upper asymptote,
//! not the unknown true starting gravity); `sg_min` is a fixed floor near 1.0.
//!
//! Two readings admit a closed-form solve through the logit transform. Three
//! readings are fitted by weighted least squares with a coarse grid over
//! `(k, t0)` plus randomized local refinement, the most recent reading
//! weighted more heavily than the older ones.

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::domain::{LogisticFitParams, MeasurementSet, SearchConfig};
use crate::math::{clamp, log_space};

/// Steepness search bounds (1/day).
pub const K_MIN: f64 = 0.001;
pub const K_MAX: f64 = 5.0;

/// Candidates with steepness at or below this are treated as flat (degenerate).
const K_DEGENERATE: f64 = 1e-6;

/// Evaluate the logistic shape at time `t`.
pub fn logistic_sg(t: f64, params: &LogisticFitParams, sg_min: f64, sg_max: f64) -> f64 {
    sg_min + (sg_max - sg_min) / (1.0 + (-params.k * (t - params.t0)).exp())
}

/// Closed-form two-point fit via the logit transform.
///
/// Returns `None` when the asymptotes collapse, the elapsed time is ~0, or
/// the implied steepness is non-finite or indistinguishable from flat.
fn fit_two_points(
    t1: f64,
    sg1: f64,
    t2: f64,
    sg2: f64,
    sg_min: f64,
    sg_max: f64,
) -> Option<LogisticFitParams> {
    let denom = sg_max - sg_min;
    if denom <= 0.0 {
        return None;
    }

    // Normalize into (0, 1), clamped away from the ends so the log stays finite.
    let y1 = clamp((sg1 - sg_min) / denom, 1e-6, 1.0 - 1e-6);
    let y2 = clamp((sg2 - sg_min) / denom, 1e-6, 1.0 - 1e-6);

    let ln1 = (y1 / (1.0 - y1)).ln();
    let ln2 = (y2 / (1.0 - y2)).ln();

    let dt = t2 - t1;
    if dt.abs() < 1e-9 {
        return None;
    }

    let k = (ln2 - ln1) / dt;
    if !k.is_finite() || k.abs() < 1e-9 {
        return None;
    }

    let t0 = t1 - ln1 / k;
    Some(LogisticFitParams { k, t0 })
}

/// Weighted SSE of a candidate against the measured samples.
///
/// The last (most recent) sample's squared residual is scaled by
/// `recency_weight`; out-of-contract candidates score infinite error.
fn weighted_sse(
    set: &MeasurementSet,
    params: &LogisticFitParams,
    sg_min: f64,
    sg_max: f64,
    recency_weight: f64,
) -> f64 {
    if !(params.k > K_DEGENERATE) || !params.k.is_finite() || !params.t0.is_finite() {
        return f64::INFINITY;
    }
    let samples = set.samples();
    let last = samples.len() - 1;
    let mut err = 0.0;
    for (i, s) in samples.iter().enumerate() {
        let pred = logistic_sg(s.time_days, params, sg_min, sg_max);
        let d = pred - s.sg;
        let w = if i == last { recency_weight } else { 1.0 };
        err += w * d * d;
    }
    err
}

/// Fit the logistic shape to a measurement set.
///
/// Two samples use the exact closed form; three samples run the weighted
/// grid-plus-refinement search. `None` means the logistic path is unavailable
/// for this request (the mechanistic fit is independent and still attempted).
pub fn fit_logistic(
    set: &MeasurementSet,
    sg_min: f64,
    recency_weight: f64,
    search: &SearchConfig,
    rng: &mut StdRng,
) -> Option<LogisticFitParams> {
    let sg_max = set.sg_max();
    let samples = set.samples();

    if let MeasurementSet::Pair([a, b]) = set {
        return fit_two_points(a.time_days, a.sg, b.time_days, b.sg, sg_min, sg_max);
    }

    if sg_max - sg_min <= 0.0 {
        return None;
    }

    let t_min = samples[0].time_days;
    let t_max = samples[samples.len() - 1].time_days;
    let span = (t_max - t_min).max(1e-6);

    // t0 may sit one span-width outside the observed window on either side.
    let t0_min = t_min - span;
    let t0_max = t_max + span;

    let k_axis = log_space(K_MIN, K_MAX, search.logistic_k_steps.max(2)).ok()?;

    let mut best = LogisticFitParams {
        k: 0.2,
        t0: (t_min + t_max) / 2.0,
    };
    let mut best_err = f64::INFINITY;

    // Coarse grid: log-scale over k, linear over t0.
    for &k in &k_axis {
        for j in 0..search.logistic_t0_steps.max(2) {
            let frac = j as f64 / (search.logistic_t0_steps.max(2) as f64 - 1.0);
            let candidate = LogisticFitParams {
                k,
                t0: t0_min + (t0_max - t0_min) * frac,
            };
            let err = weighted_sse(set, &candidate, sg_min, sg_max, recency_weight);
            if err < best_err {
                best = candidate;
                best_err = err;
            }
        }
    }

    // Randomized local refinement around the running best.
    for _ in 0..search.logistic_refine_trials {
        let candidate = LogisticFitParams {
            k: clamp(best.k * (0.7 + 0.6 * rng.gen_range(0.0..1.0)), K_MIN, K_MAX),
            t0: clamp(
                best.t0 + (rng.gen_range(0.0..1.0) - 0.5) * 0.6 * span,
                t0_min,
                t0_max,
            ),
        };
        let err = weighted_sse(set, &candidate, sg_min, sg_max, recency_weight);
        if err < best_err {
            best = candidate;
            best_err = err;
        }
    }

    if best_err.is_finite() {
        Some(best)
    } else {
        None
    }
}
