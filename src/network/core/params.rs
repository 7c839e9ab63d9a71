//! Parameter-vector layout and zero-copy segment views.
//!
//! Purpose
//! -------
//! Describe how a flattened candidate vector maps onto model parameters and
//! provide an allocation-free split of a vector into its decay, production,
//! and reaction-strength segments. A [`SolutionLayout`] is fixed at problem
//! construction; every candidate vector presented afterwards is checked
//! against it before any simulation work starts.
//!
//! Key behaviors
//! -------------
//! - [`SolutionLayout::new`] validates the node count once and derives the
//!   expected vector dimension `2n + m`.
//! - [`SolutionLayout::check`] rejects vectors of the wrong length with a
//!   domain error instead of panicking.
//! - [`SolutionSegments::split`] borrows a candidate vector as three
//!   read-only views without copying.
//!
//! Invariants & assumptions
//! ------------------------
//! - Segment order is fixed: `n` decay rates, then `n` production maxima,
//!   then `m` reaction strengths.
//! - Decay rates and production maxima are conventionally non-negative but
//!   this is *not* enforced here; bounds enforcement is the problem
//!   boundary's concern.
//! - This module is purely numeric; it performs no I/O and emits no logging.

use crate::network::{
    errors::{NetworkError, NetworkResult},
    types::Solution,
};
use ndarray::{s, ArrayView1};

/// Shape descriptor for a candidate parameter vector.
///
/// Carries the node count `n` and the allowed-reaction count `m`; the
/// implied vector dimension is `2n + m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolutionLayout {
    nodes: usize,
    reactions: usize,
}

impl SolutionLayout {
    /// Construct a validated layout for `nodes` network nodes and
    /// `reactions` allowed reactions.
    ///
    /// # Errors
    /// Returns [`NetworkError::EmptyNetwork`] when `nodes == 0`. A zero
    /// reaction count is accepted: a fully disconnected network is a valid,
    /// if trivial, model.
    pub fn new(nodes: usize, reactions: usize) -> NetworkResult<Self> {
        if nodes == 0 {
            return Err(NetworkError::EmptyNetwork);
        }
        Ok(Self { nodes, reactions })
    }

    /// Number of network nodes `n`.
    pub fn nodes(&self) -> usize {
        self.nodes
    }

    /// Number of allowed reactions `m`.
    pub fn reactions(&self) -> usize {
        self.reactions
    }

    /// Expected candidate-vector length, `2n + m`.
    pub fn dimension(&self) -> usize {
        2 * self.nodes + self.reactions
    }

    /// Check a candidate vector against this layout.
    ///
    /// # Errors
    /// Returns [`NetworkError::SolutionLengthMismatch`] when the vector
    /// length differs from [`SolutionLayout::dimension`].
    pub fn check(&self, solution: &Solution) -> NetworkResult<()> {
        let expected = self.dimension();
        if solution.len() != expected {
            return Err(NetworkError::SolutionLengthMismatch {
                expected,
                actual: solution.len(),
            });
        }
        Ok(())
    }
}

/// Zero-copy views over the three segments of a candidate vector.
///
/// Borrowed from a caller-owned [`Solution`]; constructing the split never
/// allocates. The views are read-only: evaluation code that needs to
/// perturb an entry works on its own owned copy of the full vector.
#[derive(Debug)]
pub struct SolutionSegments<'a> {
    /// Per-node decay rates, length `n`.
    pub decay: ArrayView1<'a, f64>,
    /// Per-node production maxima, length `n`.
    pub production_max: ArrayView1<'a, f64>,
    /// Reaction strengths in mask order, length `m`.
    pub strengths: ArrayView1<'a, f64>,
}

impl<'a> SolutionSegments<'a> {
    /// Split a candidate vector into its segments under `layout`.
    ///
    /// # Errors
    /// Returns [`NetworkError::SolutionLengthMismatch`] when the vector
    /// length does not match the layout dimension.
    pub fn split(solution: &'a Solution, layout: &SolutionLayout) -> NetworkResult<Self> {
        layout.check(solution)?;
        let n = layout.nodes();
        Ok(Self {
            decay: solution.slice(s![..n]),
            production_max: solution.slice(s![n..2 * n]),
            strengths: solution.slice(s![2 * n..]),
        })
    }
}
