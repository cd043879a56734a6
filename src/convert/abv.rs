//! ABV-from-gravity strategies.
//!
//! Two incompatible formula families circulate in home-brewing references:
//!
//! - an HMRC-style rational formula directly on SG readings
//! - a Balling attenuation formula on degrees Plato
//!
//! Call sites pick one via [`AbvMethod`] so a single run never mixes
//! conventions. HMRC is the canonical default; Plato is the documented
//! alternative.

use crate::convert::{A0, A1, brix_from_sg};
use crate::domain::AbvMethod;

/// HMRC-style ABV (%). `og`/`fg` are 1.xxx specific gravities.
pub fn abv_hmrc(og: f64, fg: f64) -> f64 {
    (og - fg) / (A0 - A1 * og)
}

/// Balling/Plato ABV (%).
///
/// Gravities are converted to degrees Plato through the SG cubic, attenuation
/// is taken in Plato space, and alcohol by weight is rescaled to by-volume
/// with the finished beverage's density.
pub fn abv_plato(og: f64, fg: f64) -> f64 {
    let op = brix_from_sg(og);
    let fp = brix_from_sg(fg);
    let abw = (op - fp) / (2.0665 - 0.010665 * op);
    abw * fg / 0.794
}

/// Compute ABV (%) under the selected convention.
pub fn abv(method: AbvMethod, og: f64, fg: f64) -> f64 {
    match method {
        AbvMethod::Hmrc => abv_hmrc(og, fg),
        AbvMethod::Plato => abv_plato(og, fg),
    }
}
