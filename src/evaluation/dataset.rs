//! Validated perturbation-response measurement table.
//!
//! Purpose
//! -------
//! Carry the experimental data one fit runs against: a `k × (k + w)` table
//! for `k` perturbed factors, whose first `k` columns hold measured
//! perturbation magnitudes (the diagonal is the per-factor perturbation
//! applied) and whose remaining `w` columns hold the time sequence at which
//! that factor's perturbed and control trajectories are compared.
//!
//! Key behaviors
//! -------------
//! - [`PerturbationDataset::new`] validates the table once, fatally:
//!   shape, finiteness, and strictly ascending time columns per row.
//! - Accessors expose zero-copy views; the table is immutable afterwards
//!   and is shared read-only (typically behind an `Arc`) by evaluators and
//!   workers.
//!
//! Conventions
//! -----------
//! - A magnitude is a fold-change deviation: `0.0` means the factor is
//!   left untouched and the applied multiplier is `1 + magnitude`.
//! - Rows may share identical time sequences; evaluators exploit that
//!   through the baseline cache.

use crate::evaluation::errors::{EvalError, EvalResult};
use ndarray::{s, Array1, Array2, ArrayView1};

/// Immutable `k × (k + w)` perturbation-response table.
#[derive(Debug, Clone, PartialEq)]
pub struct PerturbationDataset {
    table: Array2<f64>,
    factors: usize,
}

impl PerturbationDataset {
    /// Validate and take ownership of a raw measurement table.
    ///
    /// # Errors
    /// - [`EvalError::EmptyDataset`] when the table has no rows.
    /// - [`EvalError::DatasetTooNarrow`] when there are fewer than
    ///   `k + 2` columns (a magnitude block plus at least two time points).
    /// - [`EvalError::NonFiniteDatasetEntry`] on any NaN or infinite entry.
    /// - [`EvalError::NonAscendingTimes`] when a row's time columns are not
    ///   strictly increasing.
    pub fn new(table: Array2<f64>) -> EvalResult<Self> {
        let (rows, cols) = table.dim();
        if rows == 0 {
            return Err(EvalError::EmptyDataset);
        }
        if cols < rows + 2 {
            return Err(EvalError::DatasetTooNarrow { rows, cols });
        }
        for ((row, col), &value) in table.indexed_iter() {
            if !value.is_finite() {
                return Err(EvalError::NonFiniteDatasetEntry { row, col, value });
            }
        }
        for row in 0..rows {
            for col in (rows + 1)..cols {
                if table[(row, col)] <= table[(row, col - 1)] {
                    return Err(EvalError::NonAscendingTimes { row, col });
                }
            }
        }
        Ok(Self { table, factors: rows })
    }

    /// Number of perturbed factors `k`.
    pub fn factors(&self) -> usize {
        self.factors
    }

    /// Number of comparison time points per row `w`.
    pub fn window(&self) -> usize {
        self.table.ncols() - self.factors
    }

    /// Applied perturbation magnitude for factor `i` (the diagonal entry).
    ///
    /// The evaluator multiplies the factor's parameter entry by
    /// `1 + magnitude(i)`.
    pub fn magnitude(&self, i: usize) -> f64 {
        self.table[(i, i)]
    }

    /// Time sequence over which factor `i` is compared.
    pub fn times(&self, i: usize) -> ArrayView1<'_, f64> {
        self.table.slice(s![i, self.factors..])
    }

    /// The measured magnitude block flattened row-major, length `k²`.
    ///
    /// This is the observation vector of the final least-squares fit.
    pub fn magnitudes_flat(&self) -> Array1<f64> {
        Array1::from_iter(self.table.slice(s![.., ..self.factors]).iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Shape, finiteness, and time-ordering validation.
    // - Accessor semantics: diagonal magnitudes, per-row time views, and
    //   the row-major flattened magnitude block.
    // -------------------------------------------------------------------------

    fn two_factor_table() -> Array2<f64> {
        array![
            [-0.5, 0.1, 0.0, 1.0, 2.0],
            [0.2, 0.8, 0.0, 0.5, 1.5],
        ]
    }

    #[test]
    fn accepts_well_formed_table() {
        let dataset = PerturbationDataset::new(two_factor_table()).unwrap();
        assert_eq!(dataset.factors(), 2);
        assert_eq!(dataset.window(), 3);
        assert_eq!(dataset.magnitude(0), -0.5);
        assert_eq!(dataset.magnitude(1), 0.8);
        assert_eq!(dataset.times(1).to_vec(), vec![0.0, 0.5, 1.5]);
        assert_eq!(dataset.magnitudes_flat().to_vec(), vec![-0.5, 0.1, 0.2, 0.8]);
    }

    #[test]
    fn rejects_empty_table() {
        let table = Array2::<f64>::zeros((0, 4));
        assert_eq!(PerturbationDataset::new(table), Err(EvalError::EmptyDataset));
    }

    #[test]
    fn rejects_too_narrow_table() {
        // Two factors need at least 4 columns; 3 leaves a single time point.
        let table = array![[0.0, 0.1, 1.0], [0.2, 0.0, 1.0]];
        assert_eq!(
            PerturbationDataset::new(table),
            Err(EvalError::DatasetTooNarrow { rows: 2, cols: 3 })
        );
    }

    #[test]
    fn rejects_non_finite_entry() {
        let mut table = two_factor_table();
        table[(1, 3)] = f64::NAN;
        assert!(matches!(
            PerturbationDataset::new(table),
            Err(EvalError::NonFiniteDatasetEntry { row: 1, col: 3, .. })
        ));
    }

    #[test]
    fn rejects_non_ascending_times() {
        let mut table = two_factor_table();
        table[(0, 4)] = table[(0, 3)]; // duplicate time point
        assert_eq!(
            PerturbationDataset::new(table),
            Err(EvalError::NonAscendingTimes { row: 0, col: 4 })
        );
    }
}
