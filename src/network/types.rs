//! network::types — shared numeric aliases for the model domain.
//!
//! Purpose
//! -------
//! Centralize the core numeric types used across encoding, dynamics, and
//! evaluation. By defining these in one place, the rest of the crate can
//! stay agnostic to `ndarray` generics and can more easily evolve if the
//! backend changes.
//!
//! Conventions
//! -----------
//! - A [`Solution`] is the flattened candidate parameter vector an external
//!   optimizer proposes: `n` decay rates, then `n` production maxima, then
//!   `m` reaction strengths, for a total of `2n + m` entries.
//! - A [`Trace`] is a dense simulated trajectory with one row per requested
//!   time point and one column per network node.
//! - [`Cost`] is the scalar objective value, a non-negative residual sum
//!   where lower means a better fit.

use ndarray::{Array1, Array2};

/// Candidate parameter vector proposed by the optimizer.
///
/// Alias for `ndarray::Array1<f64>`; length is `2n + m` for `n` nodes and
/// `m` allowed reactions.
pub type Solution = Array1<f64>;

/// Dense simulated trajectory: `times.len() × n`.
pub type Trace = Array2<f64>;

/// Scalar objective value returned by one evaluation.
pub type Cost = f64;
