//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized
//!
//! Sub-results a run could not produce are rendered as an explicit
//! "unavailable" line, never silently dropped.

use crate::app::pipeline::RunOutput;
use crate::domain::{DurationBreakdown, ForecastConfig, MonodSeries};
use crate::math::interp_at;
use crate::recipe::{BacksweetenOutput, PhAdjustment, RecipeOutput, RecipeSpec};

/// Format the full forecast summary: inputs, fits, milestone table, query.
pub fn format_forecast_summary(run: &RunOutput, config: &ForecastConfig) -> String {
    let mut out = String::new();

    out.push_str("=== fermcast - Fermentation Forecast ===\n");
    out.push_str(&format!(
        "Batch: {:.1} L | yeast {:.1} g | horizon {:.1} days\n",
        config.volume_l, config.yeast_mass_g, config.predict_end_days
    ));
    out.push_str("Samples:\n");
    for s in run.set.samples() {
        out.push_str(&format!("  day {:>5.2}  SG {:.4}\n", s.time_days, s.sg));
    }

    out.push_str("\nLogistic shape fit:\n");
    match &run.logistic_fit {
        Some(fit) => out.push_str(&format!(
            "  k={:.4} /day  t0={:.2} days\n",
            fit.k, fit.t0
        )),
        None => out.push_str("  unavailable (degenerate fit)\n"),
    }

    out.push_str(&format!(
        "\n{} fit (weighted SSE {:.3e}):\n",
        run.monod_fit.variant.display_name(),
        run.monod_fit.sse
    ));
    out.push_str(&format!(
        "  mu_max={:.4} /day  Ks={:.3} g/L",
        run.monod_fit.params.mu_max, run.monod_fit.params.ks
    ));
    if let Some(kd) = run.monod_fit.params.kd {
        out.push_str(&format!("  kd={:.4} /day", kd));
    }
    out.push('\n');

    out.push_str("\nForecast (mechanistic):\n");
    out.push_str("  day      SG      ABV%   yeast g/L\n");
    for day in milestone_days(config.predict_end_days) {
        out.push_str(&format_series_row(&run.monod, day));
    }

    if let Some(p) = &run.point {
        out.push_str(&format!(
            "\nQuery at day {:.3}: SG {:.4} | ABV {:.2}% | yeast {:.3} g/L\n",
            p.time_days, p.sg, p.abv, p.biomass
        ));
    }

    out
}

fn milestone_days(horizon: f64) -> Vec<f64> {
    // At most ~8 rows, on whole or half days.
    let step = (horizon / 7.0).max(0.5);
    let mut days = Vec::new();
    let mut d = 0.0;
    while d < horizon - 1e-9 {
        days.push(d);
        d += step;
    }
    days.push(horizon);
    days
}

fn format_series_row(series: &MonodSeries, day: f64) -> String {
    let sg = interp_at(&series.t, &series.sg, day);
    let abv = interp_at(&series.t, &series.abv, day);
    let biomass = interp_at(&series.t, &series.biomass, day);
    format!("  {:>5.1}  {:.4}  {:>5.2}  {:>8.3}\n", day, sg, abv, biomass)
}

/// Format a duration breakdown.
pub fn format_duration(d: &DurationBreakdown) -> String {
    let mut out = String::new();
    if d.swapped {
        out.push_str("(end preceded start; values reported on the swapped pair)\n");
    }
    out.push_str(&format!(
        "{}d {}h {}m {}s\n",
        d.days, d.hours, d.minutes, d.seconds
    ));
    out.push_str(&format!(
        "total: {:.4} days | {:.2} hours | {:.1} minutes | {:.0} seconds\n",
        d.total_days, d.total_hours, d.total_minutes, d.total_seconds
    ));
    out
}

/// Format a batch design.
pub fn format_recipe(spec: &RecipeSpec, r: &RecipeOutput) -> String {
    let mut out = String::new();
    out.push_str("=== fermcast - Batch Design ===\n");
    out.push_str(&format!(
        "Target: {:.1}% ABV finishing at SG {:.3} in {:.1} L\n",
        spec.target_abv, spec.final_gravity, spec.volume_l
    ));
    out.push_str(&format!(
        "Starting gravity estimate: {:.3} ({:.1} Brix)\n\n",
        r.starting_gravity, r.brix
    ));
    out.push_str(&format!("Pure sugar needed: {:.1} g\n", r.total_sugar_g));
    out.push_str(&format!(
        "Honey required:    {:.1} g ({:.2} L)\n",
        r.honey_mass_g, r.honey_volume_l
    ));
    out.push_str(&format!("Water to add:      {:.2} L\n", r.water_volume_l));
    out.push_str(&format!("Estimated cost:    {:.2}\n", r.cost));

    match (r.fermaid_o_total_g, r.fermaid_o_per_day_g) {
        (Some(total), Some(per_day)) => {
            out.push_str(&format!(
                "\nFermaid-O: {:.2} g total, {:.2} g/day on days 0-3\n",
                total, per_day
            ));
        }
        _ => out.push_str("\nFermaid-O schedule unavailable (target ABV above 14%)\n"),
    }

    out.push_str(&format!(
        "\nBack-sweetening to SG {:.3}: {:.1} g sugar ({:.1} g honey)\n",
        spec.final_gravity, r.sweetening_sugar_g, r.sweetening_honey_g
    ));
    out
}

/// Format a back-sweetening addition.
pub fn format_backsweeten(out_: &BacksweetenOutput) -> String {
    format!(
        "Add {:.1} g pure sugar ({:.1} g honey) and stir well.\n",
        out_.sugar_g, out_.honey_g
    )
}

/// Format a pH correction.
pub fn format_ph(adj: &PhAdjustment) -> String {
    if adj.caco3_g <= 0.0 {
        return "Target pH is at or below the current pH; no CaCO3 needed.\n".to_string();
    }
    format!(
        "Add {:.2} g CaCO3 ({:.4} mol, neutralizing {:.4} mol H+).\n",
        adj.caco3_g, adj.caco3_mol, adj.delta_h_mol
    )
}
