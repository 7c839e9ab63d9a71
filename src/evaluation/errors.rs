//! Unified error handling for perturbation-cost evaluation.
//!
//! This module defines `EvalError`, the central error type for dataset
//! validation, evaluator configuration, and worker-pool setup. Model-domain
//! failures are wrapped from [`NetworkError`] so callers see one error
//! surface per layer. As everywhere in the crate, numerical degeneracies
//! during an evaluation (huge ratios, near-singular regressions) are *not*
//! errors; they are absorbed into the cost value.

use crate::network::errors::NetworkError;

/// Crate-wide result alias for evaluation operations.
pub type EvalResult<T> = Result<T, EvalError>;

/// Unified error type for perturbation-cost evaluation setup.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    // ---- Dataset ----
    /// The perturbation table must have at least one row.
    EmptyDataset,

    /// The table must carry a magnitude block plus at least two time
    /// columns per row.
    DatasetTooNarrow {
        rows: usize,
        cols: usize,
    },

    /// More perturbed factors than network nodes.
    FactorCountExceedsNodes {
        factors: usize,
        nodes: usize,
    },

    /// Every table entry must be finite.
    NonFiniteDatasetEntry {
        row: usize,
        col: usize,
        value: f64,
    },

    /// Time columns must be strictly ascending within each row.
    NonAscendingTimes {
        row: usize,
        col: usize,
    },

    // ---- Evaluator configuration ----
    /// The ratio clip ceiling must be finite and strictly positive.
    InvalidClipCeiling {
        value: f64,
        reason: &'static str,
    },

    /// Worker count must be strictly positive when given explicitly.
    InvalidWorkerCount {
        workers: usize,
        reason: &'static str,
    },

    /// Compounding semantics cannot be partitioned across workers.
    CompoundingUnsupported,

    /// The worker pool could not be constructed.
    WorkerPoolBuild {
        text: String,
    },

    // ---- Model domain ----
    Network(NetworkError),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::EmptyDataset => {
                write!(f, "Perturbation dataset must contain at least one row")
            }
            EvalError::DatasetTooNarrow { rows, cols } => {
                write!(
                    f,
                    "Perturbation dataset is {rows}x{cols}; need at least {} columns \
                     (magnitude block plus two time points)",
                    rows + 2
                )
            }
            EvalError::FactorCountExceedsNodes { factors, nodes } => {
                write!(
                    f,
                    "Dataset declares {factors} perturbed factors but the network has \
                     only {nodes} nodes"
                )
            }
            EvalError::NonFiniteDatasetEntry { row, col, value } => {
                write!(f, "Dataset entry ({row}, {col}) is {value}, must be finite")
            }
            EvalError::NonAscendingTimes { row, col } => {
                write!(f, "Dataset row {row} has a non-ascending time at column {col}")
            }
            EvalError::InvalidClipCeiling { value, reason } => {
                write!(f, "Invalid ratio clip ceiling {value}: {reason}")
            }
            EvalError::InvalidWorkerCount { workers, reason } => {
                write!(f, "Invalid worker count {workers}: {reason}")
            }
            EvalError::CompoundingUnsupported => {
                write!(
                    f,
                    "Compounding perturbation semantics cannot be partitioned across \
                     workers; use independent mode"
                )
            }
            EvalError::WorkerPoolBuild { text } => {
                write!(f, "Worker pool construction failed: {text}")
            }
            EvalError::Network(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for EvalError {}

impl From<NetworkError> for EvalError {
    fn from(err: NetworkError) -> Self {
        EvalError::Network(err)
    }
}
