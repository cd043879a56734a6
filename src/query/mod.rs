//! Evaluation grid, display series, and point queries.
//!
//! One shared grid per request: a uniform partition of `[0, horizon]` unioned
//! with the exact measured sample times and any ad-hoc query time. Both models
//! are evaluated once over that grid; every point query afterwards is linear
//! interpolation over the precomputed series, clamped at the horizon.

use crate::convert::{abv, sugar_to_sg};
use crate::domain::{
    AbvMethod, LogisticFitParams, LogisticSeries, MonodSeries, PointPrediction, SimulationTrace,
};
use crate::fit::logistic_sg;
use crate::math::{clamp, interp_at, linspace};

/// Build the shared evaluation grid.
///
/// Sample times and the optional query time are merged into the uniform
/// partition so residuals and queries land on exact nodes; the result is
/// sorted and deduplicated.
pub fn build_time_grid(
    predict_end_days: f64,
    sample_times: &[f64],
    query_time: Option<f64>,
    uniform_points: usize,
) -> Vec<f64> {
    let mut grid = linspace(0.0, predict_end_days, uniform_points.max(2));
    grid.extend_from_slice(sample_times);
    if let Some(q) = query_time {
        grid.push(q);
    }

    grid.retain(|t| t.is_finite() && *t >= 0.0);
    grid.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    grid.dedup_by(|a, b| (*a - *b).abs() < 1e-12);
    grid
}

/// Evaluate the fitted logistic shape over the grid.
///
/// SG is clamped into `[sg_min, sg_ceiling]`; ABV is computed against the
/// measured original gravity under the selected convention.
pub fn logistic_series(
    fit: &LogisticFitParams,
    grid: &[f64],
    sg_min: f64,
    sg_max: f64,
    sg_ceiling: f64,
    og: f64,
    method: AbvMethod,
) -> LogisticSeries {
    let sg: Vec<f64> = grid
        .iter()
        .map(|&t| clamp(logistic_sg(t, fit, sg_min, sg_max), sg_min, sg_ceiling))
        .collect();
    let abv_series = sg.iter().map(|&g| abv(method, og, g)).collect();
    LogisticSeries {
        t: grid.to_vec(),
        sg,
        abv: abv_series,
    }
}

/// Convert a simulated trace into the mechanistic display series.
pub fn monod_series(
    trace: &SimulationTrace,
    volume_l: f64,
    sg_min: f64,
    og: f64,
    method: AbvMethod,
) -> MonodSeries {
    let sg: Vec<f64> = trace
        .s
        .iter()
        .map(|&s| sugar_to_sg(s, volume_l).max(sg_min))
        .collect();
    let abv_series = sg.iter().map(|&g| abv(method, og, g)).collect();
    MonodSeries {
        t: trace.t.clone(),
        sg,
        biomass: trace.x.clone(),
        abv: abv_series,
    }
}

/// Interpolate the mechanistic series at one elapsed time.
pub fn point_prediction(series: &MonodSeries, time_days: f64) -> PointPrediction {
    PointPrediction {
        time_days,
        sg: interp_at(&series.t, &series.sg, time_days),
        abv: interp_at(&series.t, &series.abv, time_days),
        biomass: interp_at(&series.t, &series.biomass, time_days),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_contains_exact_sample_and_query_times() {
        let grid = build_time_grid(14.0, &[0.0, 3.0, 5.5], Some(4.25), 400);
        for want in [0.0, 3.0, 4.25, 5.5, 14.0] {
            assert!(
                grid.iter().any(|&t| (t - want).abs() < 1e-12),
                "missing {want}"
            );
        }
        for w in grid.windows(2) {
            assert!(w[1] > w[0], "grid must be strictly increasing");
        }
    }

    #[test]
    fn grid_dedups_coincident_times() {
        // Day 7 lands exactly on a uniform node of a 15-point grid over 14 days.
        let grid = build_time_grid(14.0, &[0.0, 7.0], None, 15);
        let hits = grid.iter().filter(|&&t| (t - 7.0).abs() < 1e-12).count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn logistic_series_respects_floor_and_ceiling() {
        let fit = LogisticFitParams { k: 50.0, t0: 2.0 };
        let grid = build_time_grid(10.0, &[0.0], None, 101);
        let series = logistic_series(&fit, &grid, 1.0, 1.4, 1.2, 1.4, AbvMethod::Hmrc);
        assert!(series.sg.iter().all(|&g| (1.0..=1.2).contains(&g)));
        assert_eq!(series.t.len(), series.sg.len());
        assert_eq!(series.t.len(), series.abv.len());
    }

    #[test]
    fn monod_series_floors_sg_and_carries_biomass() {
        let trace = SimulationTrace {
            t: vec![0.0, 1.0, 2.0],
            x: vec![0.25, 1.0, 4.0],
            s: vec![3000.0, 1000.0, 0.0],
        };
        let series = monod_series(&trace, 20.0, 1.0, 1.1, AbvMethod::Hmrc);
        assert_eq!(series.biomass, trace.x);
        // Depleted sugar maps below 1.0 before the floor; the floor holds it.
        assert!((series.sg[2] - 1.0).abs() < 1e-12);
        assert!(series.sg[0] > series.sg[2]);
        // ABV rises as gravity falls.
        assert!(series.abv[2] > series.abv[0]);
    }

    #[test]
    fn point_prediction_interpolates_and_clamps() {
        let series = MonodSeries {
            t: vec![0.0, 2.0, 4.0],
            sg: vec![1.100, 1.060, 1.020],
            biomass: vec![0.25, 2.0, 4.0],
            abv: vec![0.0, 5.0, 10.0],
        };
        let mid = point_prediction(&series, 1.0);
        assert!((mid.sg - 1.080).abs() < 1e-12);
        assert!((mid.abv - 2.5).abs() < 1e-12);
        assert!((mid.biomass - 1.125).abs() < 1e-12);

        let beyond = point_prediction(&series, 99.0);
        assert!((beyond.sg - 1.020).abs() < 1e-12);
        let before = point_prediction(&series, -1.0);
        assert!((before.sg - 1.100).abs() < 1e-12);
    }
}
