//! Unified error handling for network-model construction and simulation.
//!
//! This module defines `NetworkError`, the central error type for the model
//! domain: interaction-mask construction, parameter-vector layout checks,
//! initial-state validation, and integrator configuration. Every variant is
//! a configuration-class failure that callers are expected to surface at
//! problem-construction time; numerical degeneracies during simulation are
//! deliberately *not* represented here, they are absorbed into the cost
//! value instead. An alias `NetworkResult<T>` standardizes the return type
//! across the module.

/// Crate-wide result alias for network-model operations.
pub type NetworkResult<T> = Result<T, NetworkError>;

/// Unified error type for network-model construction and simulation setup.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    // ---- Interaction mask ----
    /// The interaction mask must be square.
    MaskNotSquare {
        rows: usize,
        cols: usize,
    },

    /// The network must contain at least one node.
    EmptyNetwork,

    /// A reaction edge referenced a node outside the network.
    EdgeOutOfRange {
        target: usize,
        source: usize,
        nodes: usize,
    },

    /// The reaction-strength segment does not match the mask cardinality.
    MaskCardinalityMismatch {
        active: usize,
        strengths: usize,
    },

    /// The scratch interaction matrix has the wrong shape.
    ScratchShapeMismatch {
        nodes: usize,
        rows: usize,
        cols: usize,
    },

    // ---- Parameter vector ----
    /// The candidate vector length does not equal `2n + m`.
    SolutionLengthMismatch {
        expected: usize,
        actual: usize,
    },

    // ---- Initial state ----
    /// The initial state length does not match the node count.
    InitialStateLengthMismatch {
        expected: usize,
        actual: usize,
    },

    /// Initial-state entries must be finite.
    NonFiniteInitialState {
        index: usize,
        value: f64,
    },

    // ---- Integrator configuration ----
    /// Solver tolerances must be finite and strictly positive.
    InvalidTolerance {
        value: f64,
        reason: &'static str,
    },

    /// The internal step budget must be strictly positive.
    InvalidStepBudget {
        steps: usize,
        reason: &'static str,
    },
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::MaskNotSquare { rows, cols } => {
                write!(f, "Interaction mask must be square, got {rows}x{cols}")
            }
            NetworkError::EmptyNetwork => {
                write!(f, "Network must contain at least one node")
            }
            NetworkError::EdgeOutOfRange { target, source, nodes } => {
                write!(
                    f,
                    "Reaction edge ({target}, {source}) is outside a {nodes}-node network"
                )
            }
            NetworkError::MaskCardinalityMismatch { active, strengths } => {
                write!(
                    f,
                    "Mask has {active} active reactions but {strengths} strengths were supplied"
                )
            }
            NetworkError::ScratchShapeMismatch { nodes, rows, cols } => {
                write!(
                    f,
                    "Scratch matrix is {rows}x{cols}, expected {nodes}x{nodes}"
                )
            }
            NetworkError::SolutionLengthMismatch { expected, actual } => {
                write!(f, "Solution length mismatch: expected {expected}, actual {actual}")
            }
            NetworkError::InitialStateLengthMismatch { expected, actual } => {
                write!(
                    f,
                    "Initial state length mismatch: expected {expected}, actual {actual}"
                )
            }
            NetworkError::NonFiniteInitialState { index, value } => {
                write!(f, "Initial state entry {index} is {value}, must be finite")
            }
            NetworkError::InvalidTolerance { value, reason } => {
                write!(f, "Invalid solver tolerance {value}: {reason}")
            }
            NetworkError::InvalidStepBudget { steps, reason } => {
                write!(f, "Invalid step budget {steps}: {reason}")
            }
        }
    }
}

impl std::error::Error for NetworkError {}
