//! Grid generation and interpolation primitives.
//!
//! The fitters and the query layer share three building blocks:
//!
//! - `linspace` for uniform time grids
//! - `log_space` for search axes that span orders of magnitude (steepness,
//!   half-saturation)
//! - `interp_at` for sampling a simulated series at an arbitrary time
//!
//! `interp_at` deliberately clamps outside the grid rather than extrapolating:
//! the simulation is only trusted over the horizon it was actually run on.

use crate::error::AppError;

/// Generate `n` evenly spaced points over `[a, b]` (inclusive).
///
/// `n <= 1` degenerates to the single point `a`, matching the convention of
/// the rest of the query layer (a one-node grid is still a usable grid).
pub fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![a];
    }
    let step = (b - a) / (n as f64 - 1.0);
    (0..n).map(|i| a + step * i as f64).collect()
}

/// Generate `steps` log-spaced points between `min` and `max` (inclusive).
pub fn log_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > 0.0 && max > min) {
        return Err(AppError::invalid_input(format!(
            "Invalid log range: min={min}, max={max} (must be finite, >0, and max>min)."
        )));
    }
    if steps < 2 {
        return Err(AppError::invalid_input("Log-space steps must be >= 2."));
    }

    let ln_min = min.ln();
    let ln_max = max.ln();
    let step = (ln_max - ln_min) / (steps as f64 - 1.0);

    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push((ln_min + step * i as f64).exp());
    }
    Ok(out)
}

/// Clamp `x` into `[lo, hi]`.
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    x.max(lo).min(hi)
}

/// Linearly interpolate `values` (sampled at the sorted nodes of `grid`) at `t`.
///
/// Outside the grid the nearest endpoint value is returned — no extrapolation.
/// An exact node hit returns the node value. `grid` and `values` must have the
/// same nonzero length; an empty grid yields `NaN` so the caller's finiteness
/// checks catch it.
pub fn interp_at(grid: &[f64], values: &[f64], t: f64) -> f64 {
    if grid.is_empty() || grid.len() != values.len() {
        return f64::NAN;
    }
    let n = grid.len();
    if t <= grid[0] {
        return values[0];
    }
    if t >= grid[n - 1] {
        return values[n - 1];
    }

    // Binary search for the bracketing interval.
    let idx = match grid.partition_point(|&g| g <= t) {
        0 => 1,
        i => i,
    };
    let (t0, t1) = (grid[idx - 1], grid[idx]);
    let (v0, v1) = (values[idx - 1], values[idx]);

    let dt = t1 - t0;
    if dt.abs() < 1e-15 {
        return v0;
    }
    let frac = (t - t0) / dt;
    v0 + frac * (v1 - v0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_endpoints_and_count() {
        let v = linspace(0.0, 10.0, 5);
        assert_eq!(v.len(), 5);
        assert!((v[0] - 0.0).abs() < 1e-12);
        assert!((v[4] - 10.0).abs() < 1e-12);
        assert!((v[2] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn linspace_degenerate() {
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
        assert_eq!(linspace(3.0, 9.0, 0), vec![3.0]);
    }

    #[test]
    fn log_space_includes_endpoints() {
        let v = log_space(0.001, 5.0, 7).unwrap();
        assert!((v[0] - 0.001).abs() < 1e-12);
        assert!((v[v.len() - 1] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn log_space_rejects_bad_range() {
        assert!(log_space(0.0, 1.0, 5).is_err());
        assert!(log_space(1.0, 1.0, 5).is_err());
        assert!(log_space(0.1, 10.0, 1).is_err());
    }

    #[test]
    fn interp_clamps_below_and_above() {
        let grid = [0.0, 1.0, 2.0];
        let y = [10.0, 20.0, 40.0];
        assert_eq!(interp_at(&grid, &y, -5.0), 10.0);
        assert_eq!(interp_at(&grid, &y, 99.0), 40.0);
    }

    #[test]
    fn interp_exact_node_and_midpoint() {
        let grid = [0.0, 1.0, 2.0];
        let y = [10.0, 20.0, 40.0];
        assert_eq!(interp_at(&grid, &y, 1.0), 20.0);
        assert!((interp_at(&grid, &y, 1.5) - 30.0).abs() < 1e-12);
    }

    #[test]
    fn interp_empty_is_nan() {
        assert!(interp_at(&[], &[], 1.0).is_nan());
    }
}
