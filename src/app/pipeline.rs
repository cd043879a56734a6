//! Shared "forecast pipeline" logic used by the CLI and by tests.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! validate -> logistic fit -> Monod fit -> shared grid -> series -> query
//!
//! The front-end then focuses on presentation (printing vs export).

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::convert::initial_sugar_from_sg;
use crate::domain::{
    ForecastConfig, LogisticFitParams, LogisticSeries, MeasurementSet, MonodFit, MonodSeries,
    PointPrediction,
};
use crate::error::AppError;
use crate::fit::{fit_logistic, fit_monod};
use crate::query::{build_time_grid, logistic_series, monod_series, point_prediction};
use crate::sim::simulate;

/// All computed outputs of a single forecast run.
///
/// The logistic side is `None` when that fit is degenerate; the mechanistic
/// side is attempted independently and is always present on success.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub set: MeasurementSet,
    pub logistic_fit: Option<LogisticFitParams>,
    pub monod_fit: MonodFit,
    pub logistic: Option<LogisticSeries>,
    pub monod: MonodSeries,
    pub point: Option<PointPrediction>,
}

/// Execute the full estimation pipeline and return the computed outputs.
///
/// Work per invocation is bounded: fixed grid resolutions and fixed trial
/// budgets, no state shared across calls.
pub fn run_forecast(set: &MeasurementSet, config: &ForecastConfig) -> Result<RunOutput, AppError> {
    config.validate(set)?;

    let mut rng = StdRng::seed_from_u64(config.search.seed);
    let og = set.og();

    // Empirical shape fit; degenerate data disables only this path.
    let logistic_fit = fit_logistic(
        set,
        config.sg_min,
        config.recency_weight,
        &config.search,
        &mut rng,
    );

    // Mechanistic fit from the batch's physical initial conditions.
    let x0 = config.yeast_mass_g / config.volume_l;
    let s0 = initial_sugar_from_sg(og, config.volume_l);
    let monod_fit = fit_monod(
        set,
        config.volume_l,
        x0,
        s0,
        config.sg_min,
        config.recency_weight,
        config.sim_dt_days,
        &config.search,
        &mut rng,
    )
    .ok_or_else(|| {
        AppError::invalid_input("Monod estimation produced no finite candidate; check inputs.")
    })?;

    // One shared evaluation grid per request.
    let grid = build_time_grid(
        config.predict_end_days,
        &set.times(),
        config.query_time_days,
        config.grid_points,
    );

    let trace = simulate(monod_fit.variant, &monod_fit.params, &grid, x0, s0);
    let monod = monod_series(&trace, config.volume_l, config.sg_min, og, config.abv_method);

    let logistic = logistic_fit.as_ref().map(|fit| {
        logistic_series(
            fit,
            &grid,
            config.sg_min,
            set.sg_max(),
            config.sg_ceiling,
            og,
            config.abv_method,
        )
    });

    let point = config
        .query_time_days
        .map(|t| point_prediction(&monod, t));

    Ok(RunOutput {
        set: *set,
        logistic_fit,
        monod_fit,
        logistic,
        monod,
        point,
    })
}
