//! grn_fitness — perturbation-response fitness for regulatory-network ODE
//! models.
//!
//! Purpose
//! -------
//! Serve as the objective-function engine of a gene-regulatory-network
//! fitting pipeline: encode a flattened candidate parameter vector into a
//! sigmoidal regulatory ODE, integrate it over measured time windows, and
//! score the simulated perturbation responses against experimental data
//! through a least-squares fit. The crate is the routine a population-based
//! global optimizer calls millions of times per run; it deliberately owns
//! nothing else.
//!
//! Key behaviors
//! -------------
//! - Reconstruct the sparse interaction structure from a flattened
//!   encoding with a hard no-residue guarantee across evaluations
//!   (`network::core`).
//! - Stay numerically stable under saturating nonlinearities: exponential
//!   overflow in the production term silently yields zero production, and
//!   pathological integrations degrade to best-effort trajectories instead
//!   of failing (`network`).
//! - Memoize repeated control integrations within one evaluation through
//!   an exact-key baseline cache, and optionally fan per-factor work across
//!   a long-lived worker pool with owned-copy isolation (`evaluation`).
//! - Expose the whole thing to external optimizers as a validated,
//!   bounds-aware problem implementing the backend solver traits
//!   (`problem`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Configuration errors are fatal at construction time and only there;
//!   no error in this crate terminates an in-progress optimization run.
//! - Deterministic inputs produce bit-identical costs on a fixed solver
//!   configuration.
//! - The interaction mask and dataset are the only cross-call shared
//!   resources and both are immutable after construction.
//!
//! Downstream usage
//! ----------------
//! - Build a [`problem::CoreProblem`] via
//!   [`problem::builder::CoreProblemBuilder`] from an interaction mask, an
//!   initial state, and a validated perturbation dataset.
//! - Call [`problem::CoreProblem::evaluate`] from a custom search loop, or
//!   hand the problem to an `argmin` executor through the trait impls in
//!   [`problem::adapter`].
//! - Input parsing, serialization, and the search algorithm itself are
//!   external collaborators by design.
//!
//! Testing notes
//! -------------
//! - Unit tests live in `#[cfg(test)]` modules next to each component;
//!   `tests/integration_perturbation_fit.rs` drives the full pipeline,
//!   including a real solver run.

pub mod evaluation;
pub mod network;
pub mod problem;

pub use crate::problem::builder::CoreProblemBuilder;
pub use crate::problem::CoreProblem;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use grn_fitness::prelude::*;
//
// to import the main crate surface in a single line.

pub mod prelude {
    pub use crate::evaluation::prelude::*;
    pub use crate::network::prelude::*;
    pub use crate::problem::prelude::*;
}
