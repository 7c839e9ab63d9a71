//! Adapter that exposes a [`CoreProblem`] to backend solvers.
//!
//! Implements `argmin`'s `CostFunction` and `Gradient` for the problem
//! boundary so any compatible solver (gradient-free or gradient-based) can
//! consume it directly. The gradient is always a finite-difference gradient
//! of the cost: *central* differences first, retried once with *forward*
//! differences if a cost evaluation failed inside the stencil or the
//! result came back non-finite.
//!
//! Implementation note: the finite-difference closure must return `f64`,
//! so errors raised during stencil evaluations cannot propagate with `?`.
//! The first error is captured in a `RefCell` and the closure returns NaN;
//! after differencing, the captured error is surfaced as a real error.

use crate::network::types::{Cost, Solution};
use crate::problem::CoreProblem;
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;
use std::cell::RefCell;

impl CostFunction for CoreProblem {
    type Param = Solution;
    type Output = Cost;

    /// Evaluate the perturbation cost at `param`.
    ///
    /// # Errors
    /// Propagates [`crate::problem::errors::ProblemError`] (out-of-bounds
    /// rejection, malformed candidate) as a backend error.
    fn cost(&self, param: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.evaluate(param)?)
    }
}

impl Gradient for CoreProblem {
    type Param = Solution;
    type Gradient = Solution;

    /// Finite-difference gradient of the cost at `param`.
    ///
    /// # Errors
    /// Propagates the first cost-evaluation error captured during the
    /// stencil sweep.
    fn gradient(&self, param: &Self::Param) -> Result<Self::Gradient, Error> {
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let cost_fn = |theta: &Solution| -> f64 {
            match self.cost(theta) {
                Ok(value) => value,
                Err(err) => {
                    let mut slot = closure_err.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(err);
                    }
                    f64::NAN
                }
            }
        };

        let grad = param.central_diff(&cost_fn);
        if closure_err.borrow().is_none() && grad.iter().all(|g| g.is_finite()) {
            return Ok(grad);
        }

        closure_err.replace(None);
        let grad = param.forward_diff(&cost_fn);
        if let Some(err) = closure_err.take() {
            return Err(err);
        }
        Ok(grad)
    }
}
