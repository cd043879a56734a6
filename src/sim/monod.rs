//! Fixed-step RK4 integration of the two-state Monod system.
//!
//! State is `[X, S]`: biomass concentration (g/L) and dissolved sugar mass (g).
//!
//! - Basic variant:  `dX = mu(S)·X`,        `dS = -dX/Yxs`
//! - Decay variant:  `dX = (mu(S) - kd)·X`, `dS = -(mu(S)·X)/Yxs`
//!
//! In the decay variant substrate uptake follows gross growth `mu·X`, not the
//! net rate: dying cells stop consuming sugar, they do not return it.
//!
//! The grid may be non-uniform; the step size is recomputed per interval.
//! After every step both states are clamped to >= 0, so negative biomass or
//! substrate is never observable output regardless of numerical overshoot.

use crate::convert::Y_XS;
use crate::domain::{MonodFitParams, MonodVariant, SimulationTrace};

/// Substrate floor before evaluating the growth-rate law.
const S_FLOOR: f64 = 1e-9;
/// Guard against a zero denominator when both `ks` and `s` vanish.
const MU_EPS: f64 = 1e-12;

/// Monod saturation growth rate (1/day).
pub fn mu_monod(s: f64, mu_max: f64, ks: f64) -> f64 {
    let s = s.max(S_FLOOR);
    mu_max * s / (ks + s + MU_EPS)
}

fn derivatives(variant: MonodVariant, params: &MonodFitParams, x: f64, s: f64) -> (f64, f64) {
    let mu = mu_monod(s, params.mu_max, params.ks);
    match variant {
        MonodVariant::Basic => {
            let dx = mu * x;
            let ds = if s > S_FLOOR { -dx / Y_XS } else { 0.0 };
            (dx, ds)
        }
        MonodVariant::Decay => {
            let kd = params.kd.unwrap_or(0.0);
            let dx = (mu - kd) * x;
            let ds = if s > S_FLOOR { -(mu * x) / Y_XS } else { 0.0 };
            (dx, ds)
        }
    }
}

/// Integrate the selected variant over `t_grid` from `(x0, s0)`.
///
/// `t_grid` must be sorted ascending; an empty grid yields an empty trace.
pub fn simulate(
    variant: MonodVariant,
    params: &MonodFitParams,
    t_grid: &[f64],
    x0: f64,
    s0: f64,
) -> SimulationTrace {
    let n = t_grid.len();
    let mut x = vec![0.0; n];
    let mut s = vec![0.0; n];
    if n == 0 {
        return SimulationTrace {
            t: Vec::new(),
            x,
            s,
        };
    }

    x[0] = x0.max(0.0);
    s[0] = s0.max(0.0);

    for i in 1..n {
        let h = t_grid[i] - t_grid[i - 1];
        let (xn, sn) = (x[i - 1], s[i - 1]);

        let (k1x, k1s) = derivatives(variant, params, xn, sn);
        let (k2x, k2s) = derivatives(variant, params, xn + 0.5 * h * k1x, sn + 0.5 * h * k1s);
        let (k3x, k3s) = derivatives(variant, params, xn + 0.5 * h * k2x, sn + 0.5 * h * k2s);
        let (k4x, k4s) = derivatives(variant, params, xn + h * k3x, sn + h * k3s);

        let x_next = xn + (h / 6.0) * (k1x + 2.0 * k2x + 2.0 * k3x + k4x);
        let s_next = sn + (h / 6.0) * (k1s + 2.0 * k2s + 2.0 * k3s + k4s);

        x[i] = x_next.max(0.0);
        s[i] = s_next.max(0.0);
    }

    SimulationTrace {
        t: t_grid.to_vec(),
        x,
        s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::linspace;
    use rand::prelude::*;
    use rand::rngs::StdRng;

    fn basic(mu_max: f64, ks: f64) -> MonodFitParams {
        MonodFitParams {
            mu_max,
            ks,
            kd: None,
        }
    }

    #[test]
    fn mu_saturates_with_substrate() {
        let lo = mu_monod(0.5, 1.0, 5.0);
        let hi = mu_monod(500.0, 1.0, 5.0);
        assert!(hi > lo);
        assert!(hi < 1.0, "mu must stay below mu_max");
    }

    #[test]
    fn biomass_grows_and_sugar_falls() {
        let grid = linspace(0.0, 14.0, 281);
        let trace = simulate(MonodVariant::Basic, &basic(0.8, 10.0), &grid, 0.25, 2500.0);

        for w in trace.x.windows(2) {
            assert!(w[1] >= w[0] - 1e-9, "biomass dipped: {} -> {}", w[0], w[1]);
        }
        for w in trace.s.windows(2) {
            assert!(w[1] <= w[0] + 1e-9, "sugar rose: {} -> {}", w[0], w[1]);
        }
    }

    #[test]
    fn states_never_go_negative_for_any_in_bounds_parameters() {
        let mut rng = StdRng::seed_from_u64(11);
        let grid = linspace(0.0, 30.0, 601);
        for _ in 0..50 {
            let params = MonodFitParams {
                mu_max: rng.gen_range(0.001..5.0),
                ks: rng.gen_range(0.01..50.0),
                kd: Some(rng.gen_range(0.0..5.0)),
            };
            for variant in [MonodVariant::Basic, MonodVariant::Decay] {
                let trace = simulate(variant, &params, &grid, 0.25, 2000.0);
                assert!(trace.x.iter().all(|&v| v >= 0.0));
                assert!(trace.s.iter().all(|&v| v >= 0.0));
            }
        }
    }

    #[test]
    fn decay_variant_can_shrink_biomass() {
        // kd far above mu_max: the culture dies off from the start.
        let params = MonodFitParams {
            mu_max: 0.1,
            ks: 10.0,
            kd: Some(3.0),
        };
        let grid = linspace(0.0, 10.0, 201);
        let trace = simulate(MonodVariant::Decay, &params, &grid, 1.0, 2000.0);
        assert!(trace.x.last().unwrap() < &trace.x[0]);
        assert!(trace.x.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn non_uniform_grid_is_integrated_per_interval() {
        let uneven = vec![0.0, 0.05, 0.1, 0.5, 1.0, 3.0, 3.1, 7.0];
        let trace = simulate(MonodVariant::Basic, &basic(0.6, 8.0), &uneven, 0.25, 1500.0);
        assert_eq!(trace.t.len(), uneven.len());
        assert!(trace.x.iter().all(|v| v.is_finite()));
        assert!(trace.s.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn empty_grid_yields_empty_trace() {
        let trace = simulate(MonodVariant::Basic, &basic(0.5, 5.0), &[], 0.25, 1000.0);
        assert!(trace.t.is_empty() && trace.x.is_empty() && trace.s.is_empty());
    }
}
