//! Recipe-side calculations: batch design, back-sweetening, pH correction.
//!
//! These share the conversion constants with the tracking core but run
//! before/after a ferment rather than during it. All pure functions over
//! validated numbers; nothing here touches the estimator.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::convert::{
    F_SP, FRACTION_FERMENTABLE, MW_CO2, MW_ETH, RHO_ETH, Y_XS, abv_hmrc, brix_from_sg,
    og_for_target_abv,
};
use crate::error::AppError;

/// Litres per US gallon (nutrient dosing is quoted per gallon).
const L_PER_US_GALLON: f64 = 3.78541;
/// Molar mass of CaCO3 (g/mol).
const MW_CACO3: f64 = 100.09;
/// Fermaid-O is split evenly over the first four days.
const FERMAID_O_DAYS: f64 = 4.0;
/// Above this ABV the nutrient schedule is not recommended.
const FERMAID_O_ABV_CUTOFF: f64 = 14.0;

/// Yeast nitrogen requirement class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NitrogenRequirement {
    Low,
    Medium,
    High,
}

impl NitrogenRequirement {
    fn factor(self) -> f64 {
        match self {
            NitrogenRequirement::Low => 0.75,
            NitrogenRequirement::Medium => 0.9,
            NitrogenRequirement::High => 1.25,
        }
    }
}

/// Inputs for a batch design.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeSpec {
    pub volume_l: f64,
    /// Target final gravity (SG).
    pub final_gravity: f64,
    /// Target ABV (%).
    pub target_abv: f64,
    /// Honey sugar content (%, e.g. 79.7).
    pub sugar_conc_pct: f64,
    /// Honey density (kg/m^3).
    pub density_kg_per_m3: f64,
    /// Honey cost per 100 g.
    pub cost_per_100g: f64,
    pub nitrogen_requirement: NitrogenRequirement,
}

/// Computed batch design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeOutput {
    pub starting_gravity: f64,
    pub brix: f64,
    pub total_sugar_g: f64,
    pub honey_mass_g: f64,
    pub honey_volume_l: f64,
    pub cost: f64,
    pub water_volume_l: f64,
    /// Present only when the target ABV is within the nutrient schedule's range.
    pub fermaid_o_total_g: Option<f64>,
    pub fermaid_o_per_day_g: Option<f64>,
    /// Sugar/honey needed to back-sweeten up to the target FG afterwards.
    pub sweetening_sugar_g: f64,
    pub sweetening_honey_g: f64,
}

/// Pure sugar mass (g) whose fermentation yields `ethanol_mass_kg` of ethanol
/// in a `volume_l` batch, accounting for biomass yield, CO2 loss, and the
/// unfermentable offset.
fn sugar_for_ethanol(ethanol_mass_kg: f64, volume_l: f64) -> f64 {
    (1.0 / (1.0 - Y_XS)) * (ethanol_mass_kg * (1.0 + MW_CO2 / MW_ETH) + F_SP * volume_l) * 1000.0
}

/// Ethanol mass (kg) in a batch at the given ABV.
fn ethanol_mass_kg(volume_l: f64, abv_pct: f64) -> f64 {
    (volume_l / 1000.0) * RHO_ETH * abv_pct / 100.0
}

fn honey_for_sugar(sugar_g: f64, sugar_conc_pct: f64) -> f64 {
    sugar_g / (sugar_conc_pct / 100.0) / FRACTION_FERMENTABLE
}

/// Design a batch: honey bill, water, cost, nutrients, and the back-sweetening
/// quantities for the target FG.
pub fn calculate_recipe(spec: &RecipeSpec) -> Result<RecipeOutput, AppError> {
    let fields = [
        spec.volume_l,
        spec.final_gravity,
        spec.target_abv,
        spec.sugar_conc_pct,
        spec.density_kg_per_m3,
        spec.cost_per_100g,
    ];
    if fields.iter().any(|v| !v.is_finite()) {
        return Err(AppError::invalid_input("Recipe inputs must be finite."));
    }
    if spec.volume_l <= 0.0 {
        return Err(AppError::invalid_input("Batch volume must be > 0 L."));
    }

    let starting_gravity = og_for_target_abv(spec.final_gravity, spec.target_abv);
    let total_sugar_g = sugar_for_ethanol(
        ethanol_mass_kg(spec.volume_l, spec.target_abv),
        spec.volume_l,
    );

    let (honey_mass_g, honey_volume_l, cost) = if spec.sugar_conc_pct > 0.0 {
        let mass_g = honey_for_sugar(total_sugar_g, spec.sugar_conc_pct);
        // density kg/m^3 -> kg/L
        let volume_l = (mass_g / 1000.0) / (spec.density_kg_per_m3 / 1000.0);
        let cost = (mass_g / 100.0) * spec.cost_per_100g;
        (mass_g, volume_l, cost)
    } else {
        (0.0, 0.0, 0.0)
    };

    let brix = brix_from_sg(starting_gravity);

    let (fermaid_o_total_g, fermaid_o_per_day_g) = if spec.target_abv <= FERMAID_O_ABV_CUTOFF {
        let gallons = spec.volume_l / L_PER_US_GALLON;
        let total = (brix * 10.0) * spec.nitrogen_requirement.factor() * gallons / 50.0;
        (Some(total), Some(total / FERMAID_O_DAYS))
    } else {
        (None, None)
    };

    // Back-sweetening to the target FG, phrased as the "imaginary ABV" the
    // added sugar would have produced had it fermented out.
    let sweetening = backsweetening(&BacksweetenSpec {
        current_gravity: 1.0,
        target_gravity: spec.final_gravity,
        volume_l: spec.volume_l,
        sugar_conc_pct: spec.sugar_conc_pct,
    })?;

    Ok(RecipeOutput {
        starting_gravity,
        brix,
        total_sugar_g,
        honey_mass_g,
        honey_volume_l,
        cost,
        water_volume_l: spec.volume_l - honey_volume_l,
        fermaid_o_total_g,
        fermaid_o_per_day_g,
        sweetening_sugar_g: sweetening.sugar_g,
        sweetening_honey_g: sweetening.honey_g,
    })
}

/// Inputs for a back-sweetening calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacksweetenSpec {
    /// Gravity the ferment finished at.
    pub current_gravity: f64,
    /// Gravity to sweeten up to.
    pub target_gravity: f64,
    pub volume_l: f64,
    pub sugar_conc_pct: f64,
}

/// Computed back-sweetening additions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacksweetenOutput {
    pub sugar_g: f64,
    pub honey_g: f64,
}

/// Sugar and honey mass to raise `current_gravity` to `target_gravity`.
pub fn backsweetening(spec: &BacksweetenSpec) -> Result<BacksweetenOutput, AppError> {
    let fields = [
        spec.current_gravity,
        spec.target_gravity,
        spec.volume_l,
        spec.sugar_conc_pct,
    ];
    if fields.iter().any(|v| !v.is_finite()) {
        return Err(AppError::invalid_input(
            "Back-sweetening inputs must be finite.",
        ));
    }
    if spec.volume_l <= 0.0 {
        return Err(AppError::invalid_input("Batch volume must be > 0 L."));
    }

    let imaginary_abv = abv_hmrc(spec.target_gravity, spec.current_gravity);
    let sugar_g = sugar_for_ethanol(
        ethanol_mass_kg(spec.volume_l, imaginary_abv),
        spec.volume_l,
    );
    let honey_g = if spec.sugar_conc_pct > 0.0 {
        honey_for_sugar(sugar_g, spec.sugar_conc_pct)
    } else {
        0.0
    };

    Ok(BacksweetenOutput { sugar_g, honey_g })
}

/// Computed CaCO3 addition for a pH correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhAdjustment {
    pub h_initial_mol_per_l: f64,
    pub h_target_mol_per_l: f64,
    /// Total H+ to neutralize (mol).
    pub delta_h_mol: f64,
    pub caco3_mol: f64,
    pub caco3_g: f64,
}

/// CaCO3 mass to raise a must from `current_ph` to `target_ph`.
///
/// Each carbonate consumes two protons.
pub fn ph_adjustment(current_ph: f64, target_ph: f64, volume_l: f64) -> Result<PhAdjustment, AppError> {
    if ![current_ph, target_ph, volume_l].iter().all(|v| v.is_finite()) {
        return Err(AppError::invalid_input("pH inputs must be finite."));
    }
    if volume_l <= 0.0 {
        return Err(AppError::invalid_input("Batch volume must be > 0 L."));
    }

    let h_initial = 10f64.powf(-current_ph);
    let h_target = 10f64.powf(-target_ph);

    let delta_h_mol = (h_initial - h_target) * volume_l * 1000.0;
    let caco3_mol = delta_h_mol / 2.0;

    Ok(PhAdjustment {
        h_initial_mol_per_l: h_initial,
        h_target_mol_per_l: h_target,
        delta_h_mol,
        caco3_mol,
        caco3_g: caco3_mol * MW_CACO3,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> RecipeSpec {
        RecipeSpec {
            volume_l: 20.0,
            final_gravity: 1.005,
            target_abv: 12.0,
            sugar_conc_pct: 79.7,
            density_kg_per_m3: 1376.4,
            cost_per_100g: 0.40,
            nitrogen_requirement: NitrogenRequirement::Medium,
        }
    }

    #[test]
    fn recipe_balances_masses_and_volumes() {
        let r = calculate_recipe(&spec()).unwrap();

        assert!(r.starting_gravity > spec().final_gravity);
        assert!(r.total_sugar_g > 0.0);
        // Honey carries non-sugar mass, so more honey than pure sugar.
        assert!(r.honey_mass_g > r.total_sugar_g);
        assert!(r.honey_volume_l > 0.0 && r.honey_volume_l < spec().volume_l);
        assert!((r.water_volume_l + r.honey_volume_l - 20.0).abs() < 1e-9);
        assert!(r.cost > 0.0);
    }

    #[test]
    fn nutrient_schedule_present_only_below_cutoff() {
        let r = calculate_recipe(&spec()).unwrap();
        let total = r.fermaid_o_total_g.unwrap();
        let per_day = r.fermaid_o_per_day_g.unwrap();
        assert!((per_day * 4.0 - total).abs() < 1e-9);

        let mut strong = spec();
        strong.target_abv = 16.0;
        let r = calculate_recipe(&strong).unwrap();
        assert!(r.fermaid_o_total_g.is_none());
        assert!(r.fermaid_o_per_day_g.is_none());
    }

    #[test]
    fn nitrogen_class_scales_the_dose() {
        let mut low = spec();
        low.nitrogen_requirement = NitrogenRequirement::Low;
        let mut high = spec();
        high.nitrogen_requirement = NitrogenRequirement::High;

        let dose_low = calculate_recipe(&low).unwrap().fermaid_o_total_g.unwrap();
        let dose_high = calculate_recipe(&high).unwrap().fermaid_o_total_g.unwrap();
        assert!(dose_high > dose_low);
        assert!((dose_high / dose_low - 1.25 / 0.75).abs() < 1e-9);
    }

    #[test]
    fn backsweetening_needs_nothing_when_already_at_target() {
        let out = backsweetening(&BacksweetenSpec {
            current_gravity: 1.010,
            target_gravity: 1.010,
            volume_l: 20.0,
            sugar_conc_pct: 79.7,
        })
        .unwrap();
        // Only the fixed unfermentable offset term remains.
        let offset_only = (1.0 / (1.0 - Y_XS)) * F_SP * 20.0 * 1000.0;
        assert!((out.sugar_g - offset_only).abs() < 1e-6);
    }

    #[test]
    fn backsweetening_scales_with_gravity_gap() {
        let small = backsweetening(&BacksweetenSpec {
            current_gravity: 1.000,
            target_gravity: 1.005,
            volume_l: 20.0,
            sugar_conc_pct: 79.7,
        })
        .unwrap();
        let large = backsweetening(&BacksweetenSpec {
            current_gravity: 1.000,
            target_gravity: 1.020,
            volume_l: 20.0,
            sugar_conc_pct: 79.7,
        })
        .unwrap();
        assert!(large.sugar_g > small.sugar_g);
        assert!(large.honey_g > large.sugar_g);
    }

    #[test]
    fn ph_adjustment_matches_hand_calculation() {
        // 3.0 -> 3.4 in 10 L: deltaH = (1e-3 - 10^-3.4) * 10_000 mol.
        let adj = ph_adjustment(3.0, 3.4, 10.0).unwrap();
        let expected_delta = (1e-3 - 10f64.powf(-3.4)) * 10.0 * 1000.0;
        assert!((adj.delta_h_mol - expected_delta).abs() < 1e-9);
        assert!((adj.caco3_g - expected_delta / 2.0 * 100.09).abs() < 1e-9);
        assert!(adj.caco3_g > 0.0);
    }

    #[test]
    fn lowering_ph_target_needs_no_chalk() {
        // Moving acidward gives a negative requirement; callers render that
        // as "nothing to add".
        let adj = ph_adjustment(3.8, 3.2, 10.0).unwrap();
        assert!(adj.caco3_g < 0.0);
    }
}
