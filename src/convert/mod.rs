//! Physical-quantity conversions for fermenting must.
//!
//! Everything here is a pure function over fixed stoichiometric/density
//! constants. The SG↔sugar pair is used by the Monod estimator on every
//! objective evaluation, so the two must stay exact algebraic inverses of
//! each other.

pub mod abv;

pub use abv::*;

/// HMRC ABV numerator constant.
pub const A0: f64 = 0.0102939642333984375;
/// HMRC ABV OG-correction constant.
pub const A1: f64 = 0.0026341854919339838;

/// Fermentable sugar offset (kg/L equivalent) left behind in any must.
pub const F_SP: f64 = 0.0128;
/// Yield coefficient: biomass produced per unit substrate consumed.
pub const Y_XS: f64 = 0.1;
/// Molar mass of CO2 (g/mol).
pub const MW_CO2: f64 = 44.01;
/// Molar mass of ethanol (g/mol).
pub const MW_ETH: f64 = 46.069;
/// Density of ethanol (g/L).
pub const RHO_ETH: f64 = 789.45;
/// Fraction of honey sugars that actually ferment.
pub const FRACTION_FERMENTABLE: f64 = 0.925;

/// Shared denominator of the SG↔sugar relation.
fn gravity_factor() -> f64 {
    ((1.05 / 0.79) * RHO_ETH) * (1.0 + MW_CO2 / MW_ETH)
}

/// Specific gravity of a must holding `s_g` grams of dissolved sugar in
/// `volume_l` litres.
pub fn sugar_to_sg(s_g: f64, volume_l: f64) -> f64 {
    1.0 + (1.0 - Y_XS) * (s_g / volume_l - F_SP) / gravity_factor()
}

/// Dissolved sugar mass (g) implied by a starting gravity.
///
/// Exact algebraic inverse of [`sugar_to_sg`] under the same constants and
/// volume.
pub fn initial_sugar_from_sg(sg0: f64, volume_l: f64) -> f64 {
    volume_l * ((sg0 - 1.0) * gravity_factor() / (1.0 - Y_XS) + F_SP)
}

/// Degrees Brix estimated from specific gravity (cubic approximation).
pub fn brix_from_sg(sg: f64) -> f64 {
    182.46007 * sg.powi(3) - 775.68212 * sg.powi(2) + 1262.7794 * sg - 669.56218
}

/// Original gravity needed to reach `abv_target` (%) finishing at `fg` (SG).
///
/// Inverse of the HMRC formula in [`abv::abv_hmrc`].
pub fn og_for_target_abv(fg: f64, abv_target: f64) -> f64 {
    (abv_target * A0 + fg) / (1.0 + abv_target * A1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand::rngs::StdRng;

    #[test]
    fn sugar_sg_round_trip() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let s = rng.gen_range(1.0..5000.0);
            let v = rng.gen_range(0.5..50.0);
            let back = initial_sugar_from_sg(sugar_to_sg(s, v), v);
            assert!(
                (back - s).abs() < 1e-6,
                "round trip drifted: s={s}, v={v}, back={back}"
            );
        }
    }

    #[test]
    fn more_sugar_means_higher_gravity() {
        let v = 20.0;
        let sg_light = sugar_to_sg(1000.0, v);
        let sg_heavy = sugar_to_sg(3000.0, v);
        assert!(sg_heavy > sg_light);
        assert!(sg_light > 1.0);
    }

    #[test]
    fn brix_sane_for_typical_musts() {
        // Water should read close to 0 Brix, a 1.100 must in the low twenties.
        assert!(brix_from_sg(1.000).abs() < 0.5);
        let b = brix_from_sg(1.100);
        assert!((20.0..28.0).contains(&b), "got {b}");
    }

    #[test]
    fn og_for_target_abv_inverts_hmrc() {
        let fg = 1.005;
        let target = 12.0;
        let og = og_for_target_abv(fg, target);
        let abv = abv_hmrc(og, fg);
        assert!((abv - target).abs() < 1e-9);
    }
}
