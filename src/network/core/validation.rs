//! Validation helpers for network-model construction.
//!
//! This module centralizes the consistency checks used across model setup:
//!
//! - **Initial state**: [`validate_initial_state`] enforces correct length
//!   and finite entries for the simulation starting point `y0`.
//! - **Tolerances**: [`validate_tolerance`] ensures solver tolerances are
//!   finite and strictly positive.
//! - **Step budget**: [`validate_step_budget`] rejects a zero internal step
//!   ceiling.
//!
//! These helpers standardize error reporting by returning domain-specific
//! [`NetworkError`] variants, making construction-time code uniform. None
//! of them are called on the per-evaluation hot path.

use crate::network::errors::{NetworkError, NetworkResult};
use ndarray::ArrayView1;

/// Validate the simulation initial state `y0` against the node count.
///
/// Checks:
/// - `y0.len() == nodes`
/// - every entry is finite (`NaN` and `±inf` are rejected)
///
/// # Errors
/// - [`NetworkError::InitialStateLengthMismatch`] on a length mismatch.
/// - [`NetworkError::NonFiniteInitialState`] with the index and value of
///   the first offending entry.
pub fn validate_initial_state(y0: ArrayView1<'_, f64>, nodes: usize) -> NetworkResult<()> {
    if y0.len() != nodes {
        return Err(NetworkError::InitialStateLengthMismatch {
            expected: nodes,
            actual: y0.len(),
        });
    }
    for (index, &value) in y0.iter().enumerate() {
        if !value.is_finite() {
            return Err(NetworkError::NonFiniteInitialState { index, value });
        }
    }
    Ok(())
}

/// Validate a solver tolerance (relative or absolute).
///
/// The value must be finite and strictly positive.
///
/// # Errors
/// Returns [`NetworkError::InvalidTolerance`] with `reason` naming which
/// tolerance was rejected.
pub fn validate_tolerance(value: f64, reason: &'static str) -> NetworkResult<()> {
    if !value.is_finite() {
        return Err(NetworkError::InvalidTolerance { value, reason });
    }
    if value <= 0.0 {
        return Err(NetworkError::InvalidTolerance { value, reason });
    }
    Ok(())
}

/// Validate the internal solver step budget.
///
/// # Errors
/// Returns [`NetworkError::InvalidStepBudget`] when `steps == 0`.
pub fn validate_step_budget(steps: usize) -> NetworkResult<()> {
    if steps == 0 {
        return Err(NetworkError::InvalidStepBudget {
            steps,
            reason: "Step budget must be greater than zero.",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn initial_state_accepts_finite_matching_vector() {
        let y0 = array![0.0, 1.5, 2.0];
        assert!(validate_initial_state(y0.view(), 3).is_ok());
    }

    #[test]
    fn initial_state_rejects_length_mismatch() {
        let y0 = array![0.0, 1.5];
        assert!(matches!(
            validate_initial_state(y0.view(), 3),
            Err(NetworkError::InitialStateLengthMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn initial_state_rejects_non_finite_entry() {
        let y0 = array![0.0, f64::NAN];
        match validate_initial_state(y0.view(), 2) {
            Err(NetworkError::NonFiniteInitialState { index, value }) => {
                assert_eq!(index, 1);
                assert!(value.is_nan());
            }
            other => panic!("expected NonFiniteInitialState, got {other:?}"),
        }
    }

    #[test]
    fn tolerance_rejects_zero_and_non_finite() {
        assert!(validate_tolerance(1e-6, "rtol").is_ok());
        assert!(validate_tolerance(0.0, "rtol").is_err());
        assert!(validate_tolerance(-1.0, "atol").is_err());
        assert!(validate_tolerance(f64::INFINITY, "atol").is_err());
    }

    #[test]
    fn step_budget_rejects_zero() {
        assert!(validate_step_budget(1).is_ok());
        assert!(validate_step_budget(0).is_err());
    }
}
