//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - builds validated domain inputs
//! - runs the forecast pipeline (or one of the standalone calculators)
//! - prints reports and writes optional exports

use clap::Parser;

use crate::cli::{AbvArgs, Command, DurationArgs, ForecastArgs, RecipeArgs, SweetenArgs};
use crate::convert;
use crate::domain::{ForecastConfig, MeasurementSet};
use crate::duration::duration_between_strs;
use crate::error::AppError;
use crate::recipe::{self, BacksweetenSpec, RecipeSpec};
use crate::report;

pub mod pipeline;

/// Entry point for the `fermcast` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Forecast(args) => handle_forecast(args),
        Command::Recipe(args) => handle_recipe(args),
        Command::Sweeten(args) => handle_sweeten(args),
        Command::Abv(args) => handle_abv(args),
        Command::Duration(args) => handle_duration(args),
    }
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let set = MeasurementSet::from_samples(&args.samples)?;

    let mut config = ForecastConfig::new(args.volume, args.yeast_mass, args.predict_days);
    config.abv_method = args.abv_method;
    config.recency_weight = args.recency_weight;
    config.search.seed = args.seed;
    config.search.monod_grid_steps = args.monod_grid_steps;
    config.search.monod_refine_trials = args.monod_refine_trials;
    config.search.logistic_refine_trials = args.logistic_refine_trials;

    // The query time comes either directly in days or from a timestamp pair.
    config.query_time_days = match (&args.at_days, &args.day0, &args.at) {
        (Some(days), _, _) => Some(*days),
        (None, Some(day0), Some(at)) => {
            let d = duration_between_strs(day0, at)?;
            print!("{}", report::format_duration(&d));
            Some(d.total_days)
        }
        _ => None,
    };

    let run = pipeline::run_forecast(&set, &config)?;
    print!("{}", report::format_forecast_summary(&run, &config));

    if let Some(path) = &args.export {
        crate::io::write_forecast_json(path, &run, &config)?;
        println!("\nExported forecast to {}", path.display());
    }

    Ok(())
}

fn handle_recipe(args: RecipeArgs) -> Result<(), AppError> {
    let spec = RecipeSpec {
        volume_l: args.volume,
        final_gravity: args.fg,
        target_abv: args.abv,
        sugar_conc_pct: args.sugar_pct,
        density_kg_per_m3: args.density,
        cost_per_100g: args.cost_per_100g,
        nitrogen_requirement: args.nitrogen,
    };
    let out = recipe::calculate_recipe(&spec)?;
    print!("{}", report::format_recipe(&spec, &out));
    Ok(())
}

fn handle_sweeten(args: SweetenArgs) -> Result<(), AppError> {
    let out = recipe::backsweetening(&BacksweetenSpec {
        current_gravity: args.current_sg,
        target_gravity: args.target_sg,
        volume_l: args.volume,
        sugar_conc_pct: args.sugar_pct,
    })?;
    print!("{}", report::format_backsweeten(&out));
    Ok(())
}

fn handle_abv(args: AbvArgs) -> Result<(), AppError> {
    if !(args.og.is_finite() && args.fg.is_finite()) {
        return Err(AppError::invalid_input("OG and FG must be finite numbers."));
    }
    let value = convert::abv(args.method, args.og, args.fg);
    println!("ABV: {value:.2} %");
    Ok(())
}

fn handle_duration(args: DurationArgs) -> Result<(), AppError> {
    let d = duration_between_strs(&args.start, &args.end)?;
    print!("{}", report::format_duration(&d));
    Ok(())
}
