//! Command-line parsing for the fermentation forecaster.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{AbvMethod, MeasurementSample};
use crate::recipe::NitrogenRequirement;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "fermcast",
    version,
    about = "Fermentation trajectory forecasting from sparse gravity readings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit both models to 2-3 gravity readings and print the forecast.
    Forecast(ForecastArgs),
    /// Design a batch: honey bill, water, cost, nutrient schedule.
    Recipe(RecipeArgs),
    /// Back-sweetening additions for a finished ferment.
    Sweeten(SweetenArgs),
    /// One-off ABV from OG/FG readings.
    Abv(AbvArgs),
    /// Elapsed time between two timestamps.
    Duration(DurationArgs),
}

/// Options for the forecast pipeline.
#[derive(Debug, Parser, Clone)]
pub struct ForecastArgs {
    /// Batch volume (L).
    #[arg(short = 'v', long)]
    pub volume: f64,

    /// Pitched yeast mass (g).
    #[arg(short = 'y', long)]
    pub yeast_mass: f64,

    /// Gravity reading as DAYS:SG (repeat 2 or 3 times; first must be 0:SG).
    #[arg(short = 's', long = "sample", value_parser = parse_sample)]
    pub samples: Vec<MeasurementSample>,

    /// Prediction horizon (days).
    #[arg(short = 'p', long)]
    pub predict_days: f64,

    /// ABV formula convention.
    #[arg(long, value_enum, default_value_t = AbvMethod::Hmrc)]
    pub abv_method: AbvMethod,

    /// Query the forecast at this elapsed time (days).
    #[arg(long, conflicts_with_all = ["day0", "at"])]
    pub at_days: Option<f64>,

    /// Pitch timestamp (e.g. 2024-01-01T18:00:00); query time is derived
    /// together with --at.
    #[arg(long, requires = "at")]
    pub day0: Option<String>,

    /// Query timestamp, paired with --day0.
    #[arg(long, requires = "day0")]
    pub at: Option<String>,

    /// RNG seed for the randomized refinements.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Residual weight multiplier for the most recent sample.
    #[arg(long, default_value_t = 20.0)]
    pub recency_weight: f64,

    /// Grid steps per axis for the Monod parameter search.
    #[arg(long, default_value_t = 20)]
    pub monod_grid_steps: usize,

    /// Randomized refinement trials for the Monod fit.
    #[arg(long, default_value_t = 300)]
    pub monod_refine_trials: usize,

    /// Randomized refinement trials for the logistic fit.
    #[arg(long, default_value_t = 400)]
    pub logistic_refine_trials: usize,

    /// Write the full forecast (fits + series) to this JSON file.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for batch design.
#[derive(Debug, Parser, Clone)]
pub struct RecipeArgs {
    /// Batch volume (L).
    #[arg(short = 'v', long)]
    pub volume: f64,

    /// Target final gravity (SG).
    #[arg(long)]
    pub fg: f64,

    /// Target ABV (%).
    #[arg(long)]
    pub abv: f64,

    /// Honey sugar content (%).
    #[arg(long, default_value_t = 79.7)]
    pub sugar_pct: f64,

    /// Honey density (kg/m^3).
    #[arg(long, default_value_t = 1376.4)]
    pub density: f64,

    /// Honey cost per 100 g.
    #[arg(long, default_value_t = 0.0)]
    pub cost_per_100g: f64,

    /// Yeast nitrogen requirement.
    #[arg(long, value_enum, default_value_t = NitrogenRequirement::Medium)]
    pub nitrogen: NitrogenRequirement,
}

/// Options for back-sweetening.
#[derive(Debug, Parser, Clone)]
pub struct SweetenArgs {
    /// Batch volume (L).
    #[arg(short = 'v', long)]
    pub volume: f64,

    /// Current (finished) gravity.
    #[arg(long)]
    pub current_sg: f64,

    /// Desired gravity after sweetening.
    #[arg(long)]
    pub target_sg: f64,

    /// Honey sugar content (%).
    #[arg(long, default_value_t = 79.7)]
    pub sugar_pct: f64,
}

/// Options for the one-off ABV calculator.
#[derive(Debug, Parser, Clone)]
pub struct AbvArgs {
    /// Original gravity.
    #[arg(long)]
    pub og: f64,

    /// Final gravity.
    #[arg(long)]
    pub fg: f64,

    /// ABV formula convention.
    #[arg(long, value_enum, default_value_t = AbvMethod::Hmrc)]
    pub method: AbvMethod,
}

/// Options for the duration calculator.
#[derive(Debug, Parser, Clone)]
pub struct DurationArgs {
    /// Start timestamp (e.g. 2024-01-01T18:00:00).
    #[arg(long)]
    pub start: String,

    /// End timestamp.
    #[arg(long)]
    pub end: String,
}

/// Parse a `DAYS:SG` reading (e.g. `3:1.060`).
fn parse_sample(raw: &str) -> Result<MeasurementSample, String> {
    let (days, sg) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected DAYS:SG, got '{raw}'"))?;
    let time_days: f64 = days
        .trim()
        .parse()
        .map_err(|_| format!("invalid day count '{days}'"))?;
    let sg: f64 = sg
        .trim()
        .parse()
        .map_err(|_| format!("invalid gravity '{sg}'"))?;
    if !(time_days.is_finite() && sg.is_finite()) {
        return Err(format!("non-finite reading '{raw}'"));
    }
    Ok(MeasurementSample { time_days, sg })
}
