//! Residual folding and the single-regressor least-squares reduction.
//!
//! The evaluator compares simulated perturbation responses (final-time
//! ratios of perturbed over control trajectories) against measured
//! magnitudes. Two steps happen here:
//!
//! 1. [`fold_ratios_into_residuals`]: shift each ratio by -1 so a perfect
//!    match is 0, then apply the clipping policy that bounds the influence
//!    of outliers and near-zero-denominator blow-ups.
//! 2. [`regression_residual_sum`]: regress the clipped residual column
//!    against the observed magnitudes and return the residual sum of
//!    squares, the scalar cost.
//!
//! Numeric policy: a near-singular system (predictor column with vanishing
//! norm) takes the coefficient as 0 and returns the observation energy,
//! a large-but-finite cost signal rather than an error.

use crate::network::types::Cost;
use ndarray::{Array1, ArrayView1};

/// Default ceiling applied to shifted ratios before the regression.
pub const DEFAULT_RATIO_CEILING: f64 = 2.0;

/// Shift ratios by -1 and clip, in place.
///
/// For each entry `r`:
/// - `r - 1` replaces `r` (a perfect perturbed/control match becomes 0);
/// - values above `ceiling` are clipped down to `ceiling`;
/// - non-finite values (NaN from 0/0, infinities from a vanishing control
///   value) are mapped to `ceiling`, keeping the cost finite while still
///   registering as the maximum-residual outlier.
pub fn fold_ratios_into_residuals(ratios: &mut Array1<f64>, ceiling: f64) {
    for r in ratios.iter_mut() {
        let shifted = *r - 1.0;
        *r = if !shifted.is_finite() {
            ceiling
        } else if shifted > ceiling {
            ceiling
        } else {
            shifted
        };
    }
}

/// Residual sum of squares of the best single-coefficient fit.
///
/// Solves `min_c || observed - c * predictor ||²` in closed form and
/// returns the minimized value. `predictor` and `observed` must have equal
/// length; the caller establishes this through dataset validation.
///
/// When `predictor` has (numerically) zero norm the coefficient is taken
/// as 0 and the result is `|| observed ||²`.
pub fn regression_residual_sum(
    predictor: ArrayView1<'_, f64>,
    observed: ArrayView1<'_, f64>,
) -> Cost {
    debug_assert_eq!(predictor.len(), observed.len());
    let gram = predictor.dot(&predictor);
    let coefficient = if gram <= f64::EPSILON {
        0.0
    } else {
        predictor.dot(&observed) / gram
    };
    let mut residual = 0.0;
    for (&a, &b) in predictor.iter().zip(observed.iter()) {
        let e = b - coefficient * a;
        residual += e * e;
    }
    residual
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The shift-and-clip fold, including the non-finite mapping.
    // - Closed-form correctness of the single-coefficient fit.
    // - The near-singular fallback.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Residuals that would exceed the ceiling before clipping must come out
    // at exactly the ceiling, not the raw value.
    fn fold_clips_above_ceiling() {
        let mut ratios = array![1.0, 4.5, 3.0 + DEFAULT_RATIO_CEILING];
        fold_ratios_into_residuals(&mut ratios, DEFAULT_RATIO_CEILING);
        assert_eq!(ratios.to_vec(), vec![0.0, 2.0, 2.0]);
    }

    #[test]
    fn fold_keeps_values_at_or_below_ceiling() {
        let mut ratios = array![0.0, 1.0, 3.0, -5.0];
        fold_ratios_into_residuals(&mut ratios, 2.0);
        assert_eq!(ratios.to_vec(), vec![-1.0, 0.0, 2.0, -6.0]);
    }

    #[test]
    fn fold_maps_non_finite_to_ceiling() {
        let mut ratios = array![f64::INFINITY, f64::NEG_INFINITY, f64::NAN];
        fold_ratios_into_residuals(&mut ratios, 2.0);
        assert_eq!(ratios.to_vec(), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn exact_proportional_fit_has_zero_residual() {
        let predictor = array![1.0, -2.0, 3.0];
        let observed = array![0.5, -1.0, 1.5];
        assert_eq!(regression_residual_sum(predictor.view(), observed.view()), 0.0);
    }

    #[test]
    fn residual_matches_hand_computation() {
        // predictor = [1, 1], observed = [0, 2]: c = 1, residuals (-1, 1).
        let predictor = array![1.0, 1.0];
        let observed = array![0.0, 2.0];
        let residual = regression_residual_sum(predictor.view(), observed.view());
        assert!((residual - 2.0).abs() < 1e-15);
    }

    #[test]
    fn vanishing_predictor_returns_observation_energy() {
        let predictor = array![0.0, 0.0, 0.0];
        let observed = array![1.0, 2.0, 2.0];
        assert_eq!(regression_residual_sum(predictor.view(), observed.view()), 9.0);
    }

    #[test]
    fn zero_observations_with_zero_predictor_cost_nothing() {
        let predictor = array![0.0, 0.0];
        let observed = array![0.0, 0.0];
        assert_eq!(regression_residual_sum(predictor.view(), observed.view()), 0.0);
    }
}
