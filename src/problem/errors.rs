//! Unified error handling for the optimization problem boundary.
//!
//! This module defines `ProblemError`, the error surface external
//! optimizers see. It wraps the evaluation- and network-layer errors,
//! adds bounds-specific configuration failures and the per-call
//! constraint-violation signal, and integrates with `anyhow::Error` (the
//! backend solver's error currency) via `From` in both directions.

use crate::evaluation::errors::EvalError;
use crate::network::errors::NetworkError;

/// Crate-wide result alias for problem-boundary operations.
pub type ProblemResult<T> = Result<T, ProblemError>;

/// Unified error type for the optimization problem boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ProblemError {
    // ---- Bounds ----
    /// Bounds vectors must match the problem dimension.
    BoundsDimMismatch {
        expected: usize,
        actual: usize,
    },

    /// A bound pair is non-finite or inverted.
    InvalidBound {
        index: usize,
        lower: f64,
        upper: f64,
    },

    /// A candidate entry violated its bounds under the reject policy.
    OutOfBounds {
        index: usize,
        value: f64,
        lower: f64,
        upper: f64,
    },

    // ---- Wrapped layers ----
    Evaluation(EvalError),
    Network(NetworkError),

    // ---- Backend catchall ----
    Backend {
        text: String,
    },
}

impl std::fmt::Display for ProblemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemError::BoundsDimMismatch { expected, actual } => {
                write!(f, "Bounds dimension mismatch: expected {expected}, actual {actual}")
            }
            ProblemError::InvalidBound { index, lower, upper } => {
                write!(
                    f,
                    "Invalid bound at index {index}: [{lower}, {upper}] must be finite \
                     with lower <= upper"
                )
            }
            ProblemError::OutOfBounds { index, value, lower, upper } => {
                write!(
                    f,
                    "Candidate entry {index} = {value} violates bounds [{lower}, {upper}]"
                )
            }
            ProblemError::Evaluation(err) => err.fmt(f),
            ProblemError::Network(err) => err.fmt(f),
            ProblemError::Backend { text } => {
                write!(f, "Backend error: {text}")
            }
        }
    }
}

impl std::error::Error for ProblemError {}

impl From<EvalError> for ProblemError {
    fn from(err: EvalError) -> Self {
        ProblemError::Evaluation(err)
    }
}

impl From<NetworkError> for ProblemError {
    fn from(err: NetworkError) -> Self {
        ProblemError::Network(err)
    }
}

impl From<anyhow::Error> for ProblemError {
    fn from(err: anyhow::Error) -> Self {
        ProblemError::Backend { text: err.to_string() }
    }
}
