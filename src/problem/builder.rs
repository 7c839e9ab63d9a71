//! Builder for the optimization problem boundary.
//!
//! Purpose
//! -------
//! Collect the pieces of one fitting problem (mask, initial state, dataset,
//! evaluator configuration, bounds, policy, evaluation strategy) and
//! perform *every* fatal configuration check before a [`CoreProblem`]
//! exists. After a successful build, evaluation can only fail on a
//! malformed candidate vector or an out-of-bounds rejection; configuration
//! mistakes never surface mid-optimization.
//!
//! Conventions
//! -----------
//! - Unset bounds default to the model-family box of
//!   [`Bounds::default_for`].
//! - The default strategy is the sequential evaluator with independent
//!   perturbation semantics.

use crate::evaluation::{
    dataset::PerturbationDataset,
    parallel::ParallelPerturbationEvaluator,
    sequential::{EvaluatorOptions, PerturbationEvaluator},
};
use crate::network::core::InteractionMask;
use crate::problem::{
    bounds::{Bounds, BoundsPolicy},
    errors::{ProblemError, ProblemResult},
    CoreProblem, Engine,
};
use ndarray::Array1;
use std::sync::Arc;

/// Which evaluator backs the problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationStrategy {
    /// Single-threaded evaluation with the configured perturbation mode.
    Sequential,
    /// Worker-pool evaluation; `workers = None` sizes the pool to the
    /// factor count capped by available parallelism.
    Parallel { workers: Option<usize> },
}

impl Default for EvaluationStrategy {
    fn default() -> Self {
        EvaluationStrategy::Sequential
    }
}

/// Staged configuration for a [`CoreProblem`].
#[derive(Debug, Clone)]
pub struct CoreProblemBuilder {
    mask: Arc<InteractionMask>,
    y0: Array1<f64>,
    dataset: Arc<PerturbationDataset>,
    options: EvaluatorOptions,
    strategy: EvaluationStrategy,
    bounds: Option<Bounds>,
    policy: BoundsPolicy,
}

impl CoreProblemBuilder {
    /// Start a builder from the three mandatory inputs.
    pub fn new(
        mask: Arc<InteractionMask>,
        y0: Array1<f64>,
        dataset: Arc<PerturbationDataset>,
    ) -> Self {
        Self {
            mask,
            y0,
            dataset,
            options: EvaluatorOptions::default(),
            strategy: EvaluationStrategy::default(),
            bounds: None,
            policy: BoundsPolicy::default(),
        }
    }

    /// Override the evaluator options (perturbation mode, clip ceiling,
    /// integration settings).
    pub fn options(mut self, options: EvaluatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Choose between the sequential and worker-pool evaluators.
    pub fn strategy(mut self, strategy: EvaluationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Override the default search box.
    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Choose how out-of-bounds candidates are handled.
    pub fn policy(mut self, policy: BoundsPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run every fatal configuration check and assemble the problem.
    ///
    /// # Errors
    /// - [`ProblemError::Evaluation`] wrapping any evaluator construction
    ///   failure (initial-state mismatch, factor count, pool setup,
    ///   unsupported compounding under the parallel strategy).
    /// - [`ProblemError::BoundsDimMismatch`] when explicit bounds do not
    ///   cover the problem dimension.
    pub fn build(self) -> ProblemResult<CoreProblem> {
        let engine = match self.strategy {
            EvaluationStrategy::Sequential => Engine::Sequential(PerturbationEvaluator::new(
                self.mask,
                self.y0,
                self.dataset,
                self.options,
            )?),
            EvaluationStrategy::Parallel { workers } => {
                Engine::Parallel(ParallelPerturbationEvaluator::new(
                    self.mask,
                    self.y0,
                    self.dataset,
                    self.options,
                    workers,
                )?)
            }
        };

        let dimension = engine.layout().dimension();
        let bounds = match self.bounds {
            Some(explicit) => {
                if explicit.dimension() != dimension {
                    return Err(ProblemError::BoundsDimMismatch {
                        expected: dimension,
                        actual: explicit.dimension(),
                    });
                }
                explicit
            }
            None => Bounds::default_for(engine.layout()),
        };

        Ok(CoreProblem::assemble(engine, bounds, self.policy))
    }
}
