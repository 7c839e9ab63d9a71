//! problem — the optimization problem boundary.
//!
//! Purpose
//! -------
//! Expose one fitting problem to an external optimizer: dimensionality,
//! per-dimension bounds, and a single `evaluate(candidate) -> cost` entry
//! point wrapping the evaluation layer. The search strategy itself (which
//! candidates to propose, population bookkeeping, island migration) is
//! entirely the caller's concern; this layer only guarantees that a
//! well-built problem is safely callable with arbitrary in-bounds vectors,
//! in arbitrary order, any number of times.
//!
//! Key behaviors
//! -------------
//! - [`builder::CoreProblemBuilder`] performs every fatal configuration
//!   check up front; a constructed [`CoreProblem`] cannot fail on
//!   configuration grounds.
//! - [`bounds::BoundsPolicy`] selects between rejecting and clamping
//!   out-of-bounds candidates.
//! - [`adapter`] implements the backend solver's `CostFunction` and
//!   `Gradient` traits for [`CoreProblem`], with a finite-difference
//!   gradient fallback, so gradient-free and gradient-based solvers both
//!   consume the problem unchanged.
//!
//! Invariants & assumptions
//! ------------------------
//! - `evaluate` has no side effects visible outside the call; all scratch
//!   state is evaluation-local.
//! - Deterministic inputs produce deterministic costs regardless of the
//!   backing evaluation strategy.
//!
//! Downstream usage
//! ----------------
//! - Build with [`builder::CoreProblemBuilder`], then either call
//!   [`CoreProblem::evaluate`] directly from a custom search loop or hand
//!   the problem to a backend solver executor through the trait impls in
//!   [`adapter`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover the bounds policies, builder rejections, and the
//!   trait adapter; the crate-level integration test drives a real solver
//!   end to end.

pub mod adapter;
pub mod bounds;
pub mod builder;
pub mod errors;

use crate::evaluation::{
    parallel::ParallelPerturbationEvaluator,
    sequential::PerturbationEvaluator,
};
use crate::network::{
    core::SolutionLayout,
    types::{Cost, Solution},
};
use crate::problem::{
    bounds::{Bounds, BoundsPolicy},
    errors::{ProblemError, ProblemResult},
};

/// The evaluator backing one problem.
#[derive(Debug)]
pub(crate) enum Engine {
    Sequential(PerturbationEvaluator),
    Parallel(ParallelPerturbationEvaluator),
}

impl Engine {
    pub(crate) fn layout(&self) -> &SolutionLayout {
        match self {
            Engine::Sequential(eval) => eval.layout(),
            Engine::Parallel(eval) => eval.inner().layout(),
        }
    }

    fn cost(&self, solution: &Solution) -> ProblemResult<Cost> {
        let cost = match self {
            Engine::Sequential(eval) => eval.cost(solution)?,
            Engine::Parallel(eval) => eval.cost(solution)?,
        };
        Ok(cost)
    }
}

/// One fitting problem, ready for an external optimizer.
///
/// Construction happens exclusively through
/// [`builder::CoreProblemBuilder`]; see the module documentation for the
/// boundary contract.
#[derive(Debug)]
pub struct CoreProblem {
    engine: Engine,
    bounds: Bounds,
    policy: BoundsPolicy,
}

impl CoreProblem {
    pub(crate) fn assemble(engine: Engine, bounds: Bounds, policy: BoundsPolicy) -> Self {
        Self { engine, bounds, policy }
    }

    /// Problem dimensionality, `2n + m`.
    pub fn dimension(&self) -> usize {
        self.engine.layout().dimension()
    }

    /// The search box.
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// The configured out-of-bounds policy.
    pub fn policy(&self) -> BoundsPolicy {
        self.policy
    }

    /// Evaluate the cost of one candidate vector.
    ///
    /// # Errors
    /// - [`ProblemError::OutOfBounds`] under [`BoundsPolicy::Reject`] when
    ///   an entry leaves the box (NaN entries are violations too).
    /// - [`ProblemError::Evaluation`] wrapping a candidate-length mismatch.
    pub fn evaluate(&self, solution: &Solution) -> ProblemResult<Cost> {
        match self.policy {
            BoundsPolicy::Reject => {
                if let Some(index) = self.bounds.first_violation(solution) {
                    return Err(ProblemError::OutOfBounds {
                        index,
                        value: solution[index],
                        lower: self.bounds.lower()[index],
                        upper: self.bounds.upper()[index],
                    });
                }
                self.engine.cost(solution)
            }
            BoundsPolicy::Clamp => {
                let clamped = self.bounds.clamp(solution);
                self.engine.cost(&clamped)
            }
        }
    }
}

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::bounds::{
        Bounds, BoundsPolicy, DEFAULT_STRENGTH_LOWER_BOUND, DEFAULT_UPPER_BOUND,
    };
    pub use super::builder::{CoreProblemBuilder, EvaluationStrategy};
    pub use super::errors::{ProblemError, ProblemResult};
    pub use super::CoreProblem;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::dataset::PerturbationDataset;
    use crate::network::core::InteractionMask;
    use crate::problem::builder::CoreProblemBuilder;
    use ndarray::array;
    use std::sync::Arc;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The reject and clamp policies at the evaluate entry point.
    //
    // They intentionally DO NOT cover:
    // - Evaluator arithmetic (tested in the evaluation layer).
    // -------------------------------------------------------------------------

    fn problem(policy: BoundsPolicy) -> CoreProblem {
        let mask = Arc::new(InteractionMask::from_edges(2, &[(0, 1)]).unwrap());
        let dataset =
            Arc::new(PerturbationDataset::new(array![[0.0, 0.0, 0.5, 1.0]]).unwrap());
        CoreProblemBuilder::new(mask, array![1.0, 2.0], dataset)
            .policy(policy)
            .build()
            .unwrap()
    }

    #[test]
    fn reject_policy_flags_the_violating_entry() {
        let problem = problem(BoundsPolicy::Reject);
        let out_of_box = array![1.0, 1.0, 1.0, 25.0, 0.0];

        match problem.evaluate(&out_of_box) {
            Err(ProblemError::OutOfBounds { index, value, lower, upper }) => {
                assert_eq!(index, 3);
                assert_eq!(value, 25.0);
                assert_eq!(lower, 0.0);
                assert_eq!(upper, 20.0);
            }
            other => panic!("expected OutOfBounds, got {other:?}"),
        }
    }

    #[test]
    fn reject_policy_accepts_in_bounds_candidates() {
        let problem = problem(BoundsPolicy::Reject);
        let cost = problem.evaluate(&array![1.0, 1.0, 1.0, 1.0, 0.0]).unwrap();
        assert_eq!(cost, 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Under the clamp policy, an out-of-box candidate must be projected
    // onto the box and evaluated: the result equals evaluating the
    // projection directly.
    fn clamp_policy_projects_then_evaluates() {
        let problem = problem(BoundsPolicy::Clamp);
        let out_of_box = array![1.0, 1.0, 1.0, 25.0, -30.0];
        let projected = array![1.0, 1.0, 1.0, 20.0, -20.0];

        let clamped_cost = problem.evaluate(&out_of_box).unwrap();
        let direct_cost = problem.evaluate(&projected).unwrap();

        assert_eq!(clamped_cost.to_bits(), direct_cost.to_bits());
    }
}
