//! evaluation — perturbation cost evaluation, sequential and parallel.
//!
//! Purpose
//! -------
//! Reduce one candidate parameter vector and one measured perturbation
//! dataset to a scalar fitness. This layer owns the evaluation algorithm:
//! baseline caching, perturbation application, ratio folding, clipping, and
//! the least-squares reduction. The model mechanics (encoding, dynamics,
//! integration) live in [`crate::network`]; the optimizer-facing surface
//! lives in [`crate::problem`].
//!
//! Key behaviors
//! -------------
//! - Validate the measurement table once ([`dataset`]) and share it
//!   read-only across every evaluation and worker.
//! - Memoize control trajectories per call through an exact-key baseline
//!   cache ([`cache`]); identical time sequences integrate once.
//! - Offer two evaluators with one contract: [`sequential`] (with explicit
//!   compounding-vs-independent perturbation semantics) and [`parallel`]
//!   (worker pool, independent semantics only).
//!
//! Invariants & assumptions
//! ------------------------
//! - No mutable state survives an evaluation call or is shared between
//!   concurrent calls; the dataset and interaction mask are the only
//!   cross-call resources and both are immutable.
//! - Numerical degeneracies are absorbed into the cost (clipped residuals,
//!   observation-energy fallback); an in-progress optimization run is never
//!   terminated by this layer.
//!
//! Downstream usage
//! ----------------
//! - The problem boundary wraps one evaluator and exposes
//!   `evaluate(candidate) -> cost` to external optimizers.
//! - Callers needing instrumentation use
//!   [`sequential::PerturbationEvaluator::cost_detailed`] to observe
//!   integration counters.
//!
//! Testing notes
//! -------------
//! - Unit tests per submodule cover dataset validation, cache keying, the
//!   fold/clip/regression arithmetic, the decoupled-network zero-cost
//!   scenario, determinism, and sequential/parallel agreement.

pub mod cache;
pub mod dataset;
pub mod errors;
pub mod least_squares;
pub mod parallel;
pub mod sequential;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::dataset::PerturbationDataset;
    pub use super::errors::{EvalError, EvalResult};
    pub use super::least_squares::DEFAULT_RATIO_CEILING;
    pub use super::parallel::ParallelPerturbationEvaluator;
    pub use super::sequential::{
        CostReport, EvaluatorOptions, PerturbationEvaluator, PerturbationMode,
    };
}
