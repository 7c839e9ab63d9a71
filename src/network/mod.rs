//! network — model encoding, regulatory dynamics, and integration.
//!
//! Purpose
//! -------
//! Provide the model half of the fitness engine: turn a flattened candidate
//! vector into a parameterized regulatory ODE and simulate it over the
//! measurement time grid. Everything here is deterministic, allocation-
//! conscious, and free of I/O; the evaluation layer composes these pieces
//! into a scalar cost.
//!
//! Key behaviors
//! -------------
//! - Describe and validate the candidate-vector layout (`core::params`)
//!   and the fixed interaction sparsity structure (`core::interaction`).
//! - Decode reaction strengths into a per-evaluation scratch matrix with a
//!   hard no-residue guarantee across repeated decodes.
//! - Evaluate the saturating regulatory right-hand side (`ode`) through a
//!   guarded logistic (`stability`) that absorbs exponential overflow.
//! - Integrate over a measurement time sequence with a bounded-step
//!   adaptive solver (`integrate`) that degrades to best-effort output
//!   instead of failing or hanging.
//!
//! Invariants & assumptions
//! ------------------------
//! - The interaction mask is the only cross-call shared resource and is
//!   read-only after construction.
//! - Configuration problems (shape mismatches, bad tolerances) surface as
//!   [`errors::NetworkError`] at construction time; numerical degeneracies
//!   during simulation are absorbed into the trajectory and, downstream,
//!   the cost value.
//!
//! Downstream usage
//! ----------------
//! - The evaluation layer constructs a `SolutionLayout` from the mask,
//!   checks each incoming candidate, decodes its strengths, wires a
//!   `RegulatoryRhs`, and calls `integrate_over` for each control and
//!   perturbed trajectory it needs.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule: codec round trips in
//!   `core::interaction`, closed-form accuracy and budget exhaustion in
//!   `integrate`, overflow behavior in `stability` and `ode`.

pub mod core;
pub mod errors;
pub mod integrate;
pub mod ode;
pub mod stability;
pub mod types;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::core::{decode_interactions, InteractionMask, SolutionLayout, SolutionSegments};
    pub use super::errors::{NetworkError, NetworkResult};
    pub use super::integrate::{integrate_over, IntegrationOptions, DEFAULT_STEP_BUDGET};
    pub use super::ode::{OdeSystem, RegulatoryRhs};
    pub use super::types::{Cost, Solution, Trace};
}
