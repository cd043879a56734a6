//! Monod kinetic parameter estimation.
//!
//! Given:
//! - measured `(t_i, SG_i)` samples
//! - initial biomass and sugar from the batch inputs
//!
//! we minimize the weighted SSE, in SG space, between the measurements and a
//! simulated trajectory:
//! - simulate the selected variant over a fine uniform grid
//! - linearly interpolate the substrate trace at the *exact* measured times
//!   (with this few samples, nearest-node sampling would visibly bias the fit)
//! - convert to SG and floor at `sg_min`
//!
//! The search is a deterministic coarse grid over the physical-plausibility
//! box (evaluated in parallel, ties broken by grid index) followed by seeded
//! Gaussian refinement around the running best, each perturbation scaled to a
//! fraction of that parameter's bound range.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use rayon::prelude::*;

use crate::convert::sugar_to_sg;
use crate::domain::{MeasurementSet, MonodFit, MonodFitParams, MonodVariant, SearchConfig};
use crate::math::{clamp, interp_at, linspace};
use crate::sim::simulate;

/// Physical-plausibility bounds (1/day).
pub const MU_MAX_BOUNDS: (f64, f64) = (0.001, 5.0);
/// Half-saturation bounds (g/L).
pub const KS_BOUNDS: (f64, f64) = (0.01, 50.0);
/// Decay-rate bounds (1/day).
pub const KD_BOUNDS: (f64, f64) = (0.0, 5.0);

/// Refinement step as a fraction of each parameter's bound range.
const REFINE_FRAC: f64 = 0.08;

fn in_bounds(params: &MonodFitParams, variant: MonodVariant) -> bool {
    let mu_ok = (MU_MAX_BOUNDS.0..=MU_MAX_BOUNDS.1).contains(&params.mu_max);
    let ks_ok = (KS_BOUNDS.0..=KS_BOUNDS.1).contains(&params.ks);
    let kd_ok = match (variant, params.kd) {
        (MonodVariant::Basic, None) => true,
        (MonodVariant::Decay, Some(kd)) => (KD_BOUNDS.0..=KD_BOUNDS.1).contains(&kd),
        _ => false,
    };
    mu_ok && ks_ok && kd_ok
}

/// Shared objective state for one estimation request.
struct Objective<'a> {
    set: &'a MeasurementSet,
    t_grid: Vec<f64>,
    variant: MonodVariant,
    volume_l: f64,
    x0: f64,
    s0: f64,
    sg_min: f64,
    recency_weight: f64,
}

impl Objective<'_> {
    /// Weighted SSE in SG space; infinite for rejected candidates.
    fn sse(&self, params: &MonodFitParams) -> f64 {
        if !in_bounds(params, self.variant) {
            return f64::INFINITY;
        }

        let trace = simulate(self.variant, params, &self.t_grid, self.x0, self.s0);

        let samples = self.set.samples();
        let last = samples.len() - 1;
        let mut err = 0.0;
        for (i, sample) in samples.iter().enumerate() {
            let s_at = interp_at(&trace.t, &trace.s, sample.time_days);
            let sg_pred = sugar_to_sg(s_at, self.volume_l).max(self.sg_min);
            let d = sg_pred - sample.sg;
            let w = if i == last { self.recency_weight } else { 1.0 };
            err += w * d * d;
        }

        if err.is_finite() { err } else { f64::INFINITY }
    }
}

fn grid_candidates(variant: MonodVariant, steps: usize) -> Vec<MonodFitParams> {
    let steps = steps.max(2);
    let mu_axis = linspace(MU_MAX_BOUNDS.0, MU_MAX_BOUNDS.1, steps);
    let ks_axis = linspace(KS_BOUNDS.0, KS_BOUNDS.1, steps);

    let mut out = Vec::new();
    match variant {
        MonodVariant::Basic => {
            for &mu_max in &mu_axis {
                for &ks in &ks_axis {
                    out.push(MonodFitParams {
                        mu_max,
                        ks,
                        kd: None,
                    });
                }
            }
        }
        MonodVariant::Decay => {
            let kd_axis = linspace(KD_BOUNDS.0, KD_BOUNDS.1, steps);
            for &mu_max in &mu_axis {
                for &ks in &ks_axis {
                    for &kd in &kd_axis {
                        out.push(MonodFitParams {
                            mu_max,
                            ks,
                            kd: Some(kd),
                        });
                    }
                }
            }
        }
    }
    out
}

/// Fit Monod parameters to a measurement set.
///
/// The variant is dictated by the set: a pair fits `(mu_max, ks)` under the
/// basic model, a triple fits `(mu_max, ks, kd)` under the decay model.
/// Returns `None` only when no candidate produced a finite error (e.g.
/// non-finite initial conditions slipped past the caller).
pub fn fit_monod(
    set: &MeasurementSet,
    volume_l: f64,
    x0: f64,
    s0: f64,
    sg_min: f64,
    recency_weight: f64,
    sim_dt_days: f64,
    search: &SearchConfig,
    rng: &mut StdRng,
) -> Option<MonodFit> {
    let variant = set.variant();
    let t_max = set.t_max();
    let n_steps = ((t_max / sim_dt_days).ceil() as usize + 1).max(2);

    let objective = Objective {
        set,
        t_grid: linspace(0.0, t_max, n_steps),
        variant,
        volume_l,
        x0,
        s0,
        sg_min,
        recency_weight,
    };

    // Coarse sweep over the plausibility box. Candidates are independent, so
    // they are evaluated in parallel; the minimum breaks ties by grid index
    // to keep the result deterministic.
    let candidates = grid_candidates(variant, search.monod_grid_steps);
    let scored: Vec<(usize, f64)> = candidates
        .par_iter()
        .map(|p| objective.sse(p))
        .enumerate()
        .collect();

    let (mut best, mut best_err) = {
        let (idx, err) = scored.iter().fold((0usize, f64::INFINITY), |acc, &(i, e)| {
            if e < acc.1 { (i, e) } else { acc }
        });
        (candidates[idx], err)
    };

    // Seeded Gaussian refinement around the running best.
    let noise = Normal::new(0.0, 1.0).ok()?;
    let mu_range = MU_MAX_BOUNDS.1 - MU_MAX_BOUNDS.0;
    let ks_range = KS_BOUNDS.1 - KS_BOUNDS.0;
    let kd_range = KD_BOUNDS.1 - KD_BOUNDS.0;

    for _ in 0..search.monod_refine_trials {
        let candidate = MonodFitParams {
            mu_max: clamp(
                best.mu_max + noise.sample(rng) * REFINE_FRAC * mu_range,
                MU_MAX_BOUNDS.0,
                MU_MAX_BOUNDS.1,
            ),
            ks: clamp(
                best.ks + noise.sample(rng) * REFINE_FRAC * ks_range,
                KS_BOUNDS.0,
                KS_BOUNDS.1,
            ),
            kd: best.kd.map(|kd| {
                clamp(
                    kd + noise.sample(rng) * REFINE_FRAC * kd_range,
                    KD_BOUNDS.0,
                    KD_BOUNDS.1,
                )
            }),
        };
        let err = objective.sse(&candidate);
        if err < best_err {
            best = candidate;
            best_err = err;
        }
    }

    if best_err.is_finite() {
        Some(MonodFit {
            params: best,
            variant,
            sse: best_err,
        })
    } else {
        None
    }
}
