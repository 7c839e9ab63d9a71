//! Per-dimension bounds and the out-of-bounds policy.
//!
//! Purpose
//! -------
//! Describe the box constraints of the search space and how the problem
//! boundary reacts to candidates outside it. Bounds are fixed at problem
//! construction; the search strategy itself (how an optimizer uses them to
//! propose candidates) is entirely the caller's concern.
//!
//! Conventions
//! -----------
//! - The default box follows the standard fitting setup for this model
//!   family: decay rates and production maxima in `[0, 20]`, reaction
//!   strengths in `[-20, 20]`.
//! - Under [`BoundsPolicy::Reject`] an out-of-bounds candidate is a
//!   constraint-violation error; under [`BoundsPolicy::Clamp`] it is
//!   projected onto the box entry-wise before evaluation.

use crate::network::{core::SolutionLayout, types::Solution};
use crate::problem::errors::{ProblemError, ProblemResult};
use ndarray::Array1;

/// Default upper bound for every parameter.
pub const DEFAULT_UPPER_BOUND: f64 = 20.0;

/// Default lower bound for reaction strengths.
pub const DEFAULT_STRENGTH_LOWER_BOUND: f64 = -20.0;

/// Reaction of the problem boundary to out-of-bounds candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsPolicy {
    /// Surface a constraint-violation error.
    Reject,
    /// Project the candidate onto the box entry-wise, then evaluate.
    Clamp,
}

impl Default for BoundsPolicy {
    fn default() -> Self {
        BoundsPolicy::Reject
    }
}

/// Box constraints over the candidate vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Array1<f64>,
    upper: Array1<f64>,
}

impl Bounds {
    /// Construct validated bounds.
    ///
    /// # Errors
    /// - [`ProblemError::BoundsDimMismatch`] when the vectors differ in
    ///   length.
    /// - [`ProblemError::InvalidBound`] when a pair is non-finite or has
    ///   `lower > upper`.
    pub fn new(lower: Array1<f64>, upper: Array1<f64>) -> ProblemResult<Self> {
        if lower.len() != upper.len() {
            return Err(ProblemError::BoundsDimMismatch {
                expected: lower.len(),
                actual: upper.len(),
            });
        }
        for (index, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(ProblemError::InvalidBound { index, lower: lo, upper: hi });
            }
        }
        Ok(Self { lower, upper })
    }

    /// The default box for a given layout: `[0, 20]` for the `2n`
    /// decay/production entries, `[-20, 20]` for the `m` strengths.
    pub fn default_for(layout: &SolutionLayout) -> Self {
        let dim = layout.dimension();
        let rates = 2 * layout.nodes();
        let mut lower = Array1::zeros(dim);
        for entry in lower.iter_mut().skip(rates) {
            *entry = DEFAULT_STRENGTH_LOWER_BOUND;
        }
        let upper = Array1::from_elem(dim, DEFAULT_UPPER_BOUND);
        Self { lower, upper }
    }

    /// Problem dimension covered by these bounds.
    pub fn dimension(&self) -> usize {
        self.lower.len()
    }

    /// Lower bounds, one per dimension.
    pub fn lower(&self) -> &Array1<f64> {
        &self.lower
    }

    /// Upper bounds, one per dimension.
    pub fn upper(&self) -> &Array1<f64> {
        &self.upper
    }

    /// Index of the first entry violating the box, if any.
    pub fn first_violation(&self, solution: &Solution) -> Option<usize> {
        solution
            .iter()
            .enumerate()
            .find(|&(i, &v)| !(self.lower[i] <= v && v <= self.upper[i]))
            .map(|(i, _)| i)
    }

    /// Entry-wise projection of a candidate onto the box.
    pub fn clamp(&self, solution: &Solution) -> Solution {
        let mut clamped = solution.clone();
        for (i, entry) in clamped.iter_mut().enumerate() {
            *entry = entry.max(self.lower[i]).min(self.upper[i]);
        }
        clamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The default box shape and values.
    // - Validation of explicit bounds.
    // - Violation detection and entry-wise clamping.
    // -------------------------------------------------------------------------

    #[test]
    fn default_box_matches_model_conventions() {
        let layout = SolutionLayout::new(2, 2).unwrap();
        let bounds = Bounds::default_for(&layout);

        assert_eq!(bounds.dimension(), 6);
        assert_eq!(bounds.lower().to_vec(), vec![0.0, 0.0, 0.0, 0.0, -20.0, -20.0]);
        assert_eq!(bounds.upper().to_vec(), vec![20.0; 6]);
    }

    #[test]
    fn new_rejects_dimension_mismatch() {
        let result = Bounds::new(array![0.0, 0.0], array![1.0]);
        assert_eq!(
            result.err(),
            Some(ProblemError::BoundsDimMismatch { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn new_rejects_inverted_pair() {
        let result = Bounds::new(array![0.0, 2.0], array![1.0, 1.0]);
        assert!(matches!(result, Err(ProblemError::InvalidBound { index: 1, .. })));
    }

    #[test]
    fn new_rejects_non_finite_pair() {
        let result = Bounds::new(array![f64::NEG_INFINITY], array![1.0]);
        assert!(matches!(result, Err(ProblemError::InvalidBound { index: 0, .. })));
    }

    #[test]
    fn first_violation_finds_the_offender() {
        let bounds = Bounds::new(array![0.0, 0.0, -1.0], array![1.0, 1.0, 1.0]).unwrap();
        assert_eq!(bounds.first_violation(&array![0.5, 0.5, 0.0]), None);
        assert_eq!(bounds.first_violation(&array![0.5, 1.5, 0.0]), Some(1));
        assert_eq!(bounds.first_violation(&array![0.5, 0.5, f64::NAN]), Some(2));
    }

    #[test]
    fn clamp_projects_entry_wise() {
        let bounds = Bounds::new(array![0.0, 0.0], array![1.0, 1.0]).unwrap();
        let clamped = bounds.clamp(&array![-0.5, 2.0]);
        assert_eq!(clamped.to_vec(), vec![0.0, 1.0]);
    }
}
