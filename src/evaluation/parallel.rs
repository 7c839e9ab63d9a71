//! parallel — worker-pool variant of the perturbation evaluator.
//!
//! Purpose
//! -------
//! Fan the per-factor control/perturbed trajectory pairs of one cost
//! evaluation across a long-lived worker pool. The mathematical contract is
//! the sequential evaluator's in independent mode; the two produce
//! identical costs for identical inputs.
//!
//! Key behaviors
//! -------------
//! - The pool is built once at construction (sized to the factor count by
//!   default) and reused across every evaluation, avoiding per-call pool
//!   setup costs.
//! - Each unit of work receives its own deep copy of the candidate vector
//!   before applying its perturbation, so no worker can observe another's
//!   mutation. The decoded interaction matrix, initial state, and dataset
//!   are shared strictly read-only.
//! - Results are gathered in submission order and reduced exactly as in
//!   the sequential evaluator.
//!
//! Divergences from the sequential evaluator
//! -----------------------------------------
//! - Compounding semantics are inherently order-dependent and cannot be
//!   partitioned; requesting them here is a construction-time error.
//! - There is no baseline cache: each worker integrates its own control
//!   trajectory. This trades repeated control work for per-factor
//!   independence; the result is unchanged because the control depends
//!   only on the (unmutated) candidate and the time sequence.
//!
//! Invariants & assumptions
//! ------------------------
//! - No two workers share a mutable buffer; isolation is enforced by the
//!   owned-copy discipline, not by process boundaries.
//! - Identical candidates produce bit-identical costs, and the same bits
//!   as the sequential evaluator in independent mode.

use crate::evaluation::{
    dataset::PerturbationDataset,
    errors::{EvalError, EvalResult},
    least_squares::{fold_ratios_into_residuals, regression_residual_sum},
    sequential::{EvaluatorOptions, PerturbationEvaluator, PerturbationMode},
};
use crate::network::{
    core::{decode_interactions, InteractionMask, SolutionSegments},
    types::{Cost, Solution},
};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;

/// Worker-pool perturbation cost evaluator.
///
/// Wraps a validated [`PerturbationEvaluator`] and a dedicated rayon pool.
/// Construction performs the same fatal checks as the sequential evaluator
/// plus pool sizing; afterwards `cost` is safely callable any number of
/// times.
#[derive(Debug)]
pub struct ParallelPerturbationEvaluator {
    inner: PerturbationEvaluator,
    pool: ThreadPool,
}

impl ParallelPerturbationEvaluator {
    /// Construct a validated parallel evaluator.
    ///
    /// `workers` overrides the pool size; when `None`, the pool is sized to
    /// `min(factor count, available parallelism)`.
    ///
    /// # Errors
    /// - Everything [`PerturbationEvaluator::new`] rejects.
    /// - [`EvalError::CompoundingUnsupported`] when the options request
    ///   compounding semantics.
    /// - [`EvalError::InvalidWorkerCount`] for an explicit zero.
    /// - [`EvalError::WorkerPoolBuild`] when the pool cannot be created.
    pub fn new(
        mask: Arc<InteractionMask>,
        y0: Array1<f64>,
        dataset: Arc<PerturbationDataset>,
        options: EvaluatorOptions,
        workers: Option<usize>,
    ) -> EvalResult<Self> {
        if options.mode == PerturbationMode::Compounding {
            return Err(EvalError::CompoundingUnsupported);
        }
        let inner = PerturbationEvaluator::new(mask, y0, dataset, options)?;

        let threads = match workers {
            Some(0) => {
                return Err(EvalError::InvalidWorkerCount {
                    workers: 0,
                    reason: "Worker count must be greater than zero.",
                });
            }
            Some(explicit) => explicit,
            None => {
                let cores = std::thread::available_parallelism()
                    .map(|cores| cores.get())
                    .unwrap_or(1);
                inner.dataset().factors().min(cores).max(1)
            }
        };
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|err| EvalError::WorkerPoolBuild { text: err.to_string() })?;

        Ok(Self { inner, pool })
    }

    /// The wrapped sequential evaluator (configuration accessors).
    pub fn inner(&self) -> &PerturbationEvaluator {
        &self.inner
    }

    /// Number of threads in the worker pool.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Evaluate the perturbation cost of one candidate vector.
    ///
    /// # Errors
    /// Returns [`EvalError::Network`] wrapping a length mismatch when the
    /// candidate does not fit the layout.
    pub fn cost(&self, solution: &Solution) -> EvalResult<Cost> {
        let inner = &self.inner;
        inner.layout().check(solution)?;
        let factors = inner.dataset().factors();
        let nodes = inner.layout().nodes();

        let segments = SolutionSegments::split(solution, inner.layout())?;
        let mut interactions = Array2::zeros((nodes, nodes));
        decode_interactions(inner.mask(), segments.strengths, &mut interactions)?;
        let interactions = &interactions;

        let rows: Vec<Vec<f64>> = self.pool.install(|| {
            (0..factors)
                .into_par_iter()
                .map(|i| {
                    let times = inner.dataset().times(i);
                    let last = times.len() - 1;

                    let control = inner.simulate(solution, interactions, times);

                    // Private deep copy per unit of work; the perturbation
                    // mutation is invisible to every other worker.
                    let mut private = solution.clone();
                    private[i] *= 1.0 + inner.dataset().magnitude(i);
                    let perturbed = inner.simulate(&private, interactions, times);

                    (0..factors)
                        .map(|j| perturbed[(last, j)] / control[(last, j)])
                        .collect()
                })
                .collect()
        });

        let mut ratios = Array1::from_iter(rows.into_iter().flatten());
        fold_ratios_into_residuals(&mut ratios, inner.options().ratio_ceiling);
        let observed = inner.dataset().magnitudes_flat();
        Ok(regression_residual_sum(ratios.view(), observed.view()))
    }
}
