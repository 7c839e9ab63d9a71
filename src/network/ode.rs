//! Regulatory dynamics: the ODE right-hand side.
//!
//! Purpose
//! -------
//! Define the instantaneous derivative of the network state. Each node
//! decays linearly and is produced through a saturating logistic in the
//! weighted sum of its regulators:
//!
//! ```text
//! dx_i/dt = -lambda_i * x_i + vmax_i * sigma(sum_j K[i, j] * x_j)
//! ```
//!
//! The system is autonomous; the time argument is accepted for solver
//! compatibility and ignored.
//!
//! Key behaviors
//! -------------
//! - [`OdeSystem`] is the minimal solver-facing contract: a dimension and
//!   an `rhs` that writes into a caller buffer, so inner solver stages are
//!   allocation-free.
//! - [`RegulatoryRhs`] borrows the decay and production segments of one
//!   candidate vector plus the decoded interaction matrix; it never mutates
//!   them and holds no scratch state of its own.
//!
//! Invariants & assumptions
//! ------------------------
//! - `decay`, `production_max`, and each row of `interactions` have the
//!   same length `n`; callers establish this at construction time.
//! - Exponential overflow in the logistic term yields a zero production
//!   level through [`saturating_logistic`]; the right-hand side never traps
//!   on it and stays finite for finite inputs.

use crate::network::stability::saturating_logistic;
use ndarray::{Array2, ArrayView1};

/// Right-hand side of an ODE system `dy/dt = f(t, y)`.
///
/// `y` and `dydt` have length [`OdeSystem::ndim`]. Implementations must be
/// safe to call at every intermediate solver stage.
pub trait OdeSystem {
    /// Number of state variables.
    fn ndim(&self) -> usize;

    /// Evaluate `f(t, y)` and write the derivative into `dydt`.
    fn rhs(&self, t: f64, y: &[f64], dydt: &mut [f64]);
}

/// Regulatory-network dynamics for one candidate parameter vector.
///
/// Borrows the decay and production-maximum segments of the candidate and
/// the decoded interaction matrix for the duration of one integration; the
/// borrows guarantee nothing is mutated underneath the solver.
#[derive(Debug)]
pub struct RegulatoryRhs<'a> {
    decay: ArrayView1<'a, f64>,
    production_max: ArrayView1<'a, f64>,
    interactions: &'a Array2<f64>,
}

impl<'a> RegulatoryRhs<'a> {
    /// Wire a right-hand side over borrowed parameter segments and the
    /// decoded interaction matrix.
    ///
    /// Callers are expected to have validated the segment lengths against
    /// the network layout; this constructor only debug-asserts them.
    pub fn new(
        decay: ArrayView1<'a, f64>,
        production_max: ArrayView1<'a, f64>,
        interactions: &'a Array2<f64>,
    ) -> Self {
        debug_assert_eq!(decay.len(), production_max.len());
        debug_assert_eq!(interactions.nrows(), decay.len());
        debug_assert_eq!(interactions.ncols(), decay.len());
        Self { decay, production_max, interactions }
    }
}

impl OdeSystem for RegulatoryRhs<'_> {
    fn ndim(&self) -> usize {
        self.decay.len()
    }

    fn rhs(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        let n = self.decay.len();
        for i in 0..n {
            let mut drive = 0.0;
            for (j, &yj) in y.iter().enumerate().take(n) {
                drive += self.interactions[(i, j)] * yj;
            }
            dydt[i] = -self.decay[i] * y[i] + self.production_max[i] * saturating_logistic(drive);
        }
    }
}
