//! Interaction mask and the flattened-strength decode codec.
//!
//! Purpose
//! -------
//! Reconstruct the dense regulatory interaction matrix from the
//! reaction-strength segment of a candidate vector. The sparsity structure
//! is fixed for the lifetime of a problem as an [`InteractionMask`]; only
//! the strengths change between evaluations, so the decode step writes into
//! a caller-owned scratch matrix instead of allocating.
//!
//! Key behaviors
//! -------------
//! - [`InteractionMask`] captures which `(target, source)` pairs carry a
//!   reaction; it is built once and shared read-only across evaluations.
//! - [`decode_interactions`] writes the strengths into the masked positions
//!   in row-major mask order and explicitly zeroes every other cell, so the
//!   same scratch matrix can be reused across calls without residue from a
//!   previous candidate.
//!
//! Invariants & assumptions
//! ------------------------
//! - The mask is square (`n × n`) and non-empty.
//! - The strength segment length must equal the mask cardinality; a
//!   mismatch is a configuration error surfaced at problem construction,
//!   never a per-evaluation recoverable condition.
//! - After a successful decode, `scratch[(i, j)] == 0.0` for every inactive
//!   position, regardless of what the scratch held before the call.
//!
//! Conventions
//! -----------
//! - Entry `(i, j)` of the matrix is the influence of regulator `j` on
//!   target `i`; the row of a node collects everything acting on it.
//! - Mask order is row-major: strengths fill active cells left-to-right,
//!   top-to-bottom. Callers producing the strength segment must use the
//!   same order.

use crate::network::errors::{NetworkError, NetworkResult};
use ndarray::{Array2, ArrayView1};

/// Fixed sparsity structure of the regulatory interaction matrix.
///
/// Built once at model construction, then shared read-only (typically
/// behind an `Arc`) by every evaluator and worker. Never mutated during
/// evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionMask {
    active: Array2<bool>,
    cardinality: usize,
}

impl InteractionMask {
    /// Build a mask from an explicit boolean matrix.
    ///
    /// # Errors
    /// - [`NetworkError::MaskNotSquare`] when the matrix is not `n × n`.
    /// - [`NetworkError::EmptyNetwork`] when `n == 0`.
    pub fn new(active: Array2<bool>) -> NetworkResult<Self> {
        let (rows, cols) = active.dim();
        if rows != cols {
            return Err(NetworkError::MaskNotSquare { rows, cols });
        }
        if rows == 0 {
            return Err(NetworkError::EmptyNetwork);
        }
        let cardinality = active.iter().filter(|&&flag| flag).count();
        Ok(Self { active, cardinality })
    }

    /// Build a mask from a directed reaction-edge list.
    ///
    /// Each `(target, source)` pair activates entry `(target, source)` of
    /// the interaction matrix. Duplicate edges are idempotent.
    ///
    /// # Errors
    /// - [`NetworkError::EmptyNetwork`] when `nodes == 0`.
    /// - [`NetworkError::EdgeOutOfRange`] when an edge references a node
    ///   index `>= nodes`.
    pub fn from_edges(nodes: usize, edges: &[(usize, usize)]) -> NetworkResult<Self> {
        if nodes == 0 {
            return Err(NetworkError::EmptyNetwork);
        }
        let mut active = Array2::from_elem((nodes, nodes), false);
        for &(target, source) in edges {
            if target >= nodes || source >= nodes {
                return Err(NetworkError::EdgeOutOfRange { target, source, nodes });
            }
            active[(target, source)] = true;
        }
        Self::new(active)
    }

    /// Number of network nodes `n`.
    pub fn nodes(&self) -> usize {
        self.active.nrows()
    }

    /// Number of active reactions `m`.
    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    /// Whether entry `(target, source)` carries a reaction.
    pub fn is_active(&self, target: usize, source: usize) -> bool {
        self.active[(target, source)]
    }
}

/// Decode a flattened strength segment into a dense scratch matrix.
///
/// Writes `strengths` into the active positions of `scratch` in row-major
/// mask order and sets every inactive position to exactly `0.0`. The call
/// is idempotent over the scratch matrix: repeated decodes with different
/// strength segments never leak values from a previous candidate.
///
/// # Errors
/// - [`NetworkError::MaskCardinalityMismatch`] when
///   `strengths.len() != mask.cardinality()`.
/// - [`NetworkError::ScratchShapeMismatch`] when the scratch matrix is not
///   `n × n` for the mask's node count.
pub fn decode_interactions(
    mask: &InteractionMask,
    strengths: ArrayView1<'_, f64>,
    scratch: &mut Array2<f64>,
) -> NetworkResult<()> {
    if strengths.len() != mask.cardinality() {
        return Err(NetworkError::MaskCardinalityMismatch {
            active: mask.cardinality(),
            strengths: strengths.len(),
        });
    }
    let nodes = mask.nodes();
    let (rows, cols) = scratch.dim();
    if rows != nodes || cols != nodes {
        return Err(NetworkError::ScratchShapeMismatch { nodes, rows, cols });
    }

    let mut next = 0;
    for (cell, &flag) in scratch.iter_mut().zip(mask.active.iter()) {
        if flag {
            *cell = strengths[next];
            next += 1;
        } else {
            *cell = 0.0;
        }
    }
    Ok(())
}
