//! sequential — the perturbation cost evaluator.
//!
//! Purpose
//! -------
//! Quantify how well one candidate parameter vector reproduces the measured
//! perturbation responses. This is the routine an optimizer calls on the
//! order of population-size × generations × islands times per run, so it is
//! built around per-call scratch state, a baseline cache, and strictly
//! read-only shared configuration.
//!
//! Key behaviors
//! -------------
//! - Per perturbed factor: fetch or compute the control trajectory through
//!   a [`BaselineCache`] keyed by the factor's exact time sequence, apply
//!   the factor's perturbation to a working copy of the candidate vector,
//!   integrate the perturbed system over the same sequence, and record the
//!   final-time ratios for the perturbed factors' state entries.
//! - After the loop: shift ratios by -1, clip through the configured
//!   ceiling, and reduce against the flattened measured magnitudes with a
//!   single-coefficient least-squares fit whose residual sum is the cost.
//! - [`PerturbationEvaluator::cost_detailed`] additionally reports how many
//!   control and perturbed integrations actually ran, making cache behavior
//!   observable.
//!
//! Perturbation semantics
//! ----------------------
//! How the per-factor mutation composes across the loop is an explicit
//! parameter, [`PerturbationMode`]:
//!
//! - `Independent` (the default): each factor perturbs a private copy of
//!   the original candidate. Factors are order-insensitive and the result
//!   is identical to the parallel evaluator's.
//! - `Compounding`: factor `i` multiplies entry `i` of the *already
//!   mutated* working vector, so perturbations compose multiplicatively
//!   across the loop and cache-missed controls drift with the working
//!   vector. This reproduces the historical sequential behavior and is not
//!   numerically equivalent to `Independent`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The mask, initial state, dataset, and options are validated once in
//!   [`PerturbationEvaluator::new`]; per call, only the candidate length is
//!   checked.
//! - All mutable state (working vector, scratch interaction matrix, cache)
//!   is created inside the call; concurrent `cost` calls on one evaluator
//!   share nothing mutable.
//! - Identical candidates produce bit-identical costs.
//!
//! Conventions
//! -----------
//! - The applied multiplier for factor `i` is `1 + magnitude(i)`, so a zero
//!   measured magnitude leaves the trajectory untouched.
//! - Ratios are taken over the first `k` state entries (the perturbed
//!   factors), so the regression column and the flattened magnitude block
//!   always share length `k²`.
//! - This module performs no I/O and emits no logging.

use crate::evaluation::{
    cache::BaselineCache,
    dataset::PerturbationDataset,
    errors::{EvalError, EvalResult},
    least_squares::{fold_ratios_into_residuals, regression_residual_sum, DEFAULT_RATIO_CEILING},
};
use crate::network::{
    core::{
        decode_interactions,
        validation::validate_initial_state,
        InteractionMask, SolutionLayout, SolutionSegments,
    },
    integrate::{integrate_over, IntegrationOptions},
    ode::RegulatoryRhs,
    types::{Cost, Solution, Trace},
};
use ndarray::{s, Array1, Array2, ArrayView1};
use std::sync::Arc;

/// How per-factor perturbations compose across one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerturbationMode {
    /// Each factor perturbs a private copy of the original candidate.
    Independent,
    /// Factor `i` multiplies entry `i` of the already-mutated working
    /// vector; perturbations accumulate across the loop.
    Compounding,
}

impl Default for PerturbationMode {
    fn default() -> Self {
        PerturbationMode::Independent
    }
}

/// Evaluator-level configuration.
///
/// Fields:
/// - `mode`: perturbation composition semantics.
/// - `ratio_ceiling`: clip ceiling applied to shifted ratios.
/// - `integration`: solver tolerances and step budget.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatorOptions {
    pub mode: PerturbationMode,
    pub ratio_ceiling: f64,
    pub integration: IntegrationOptions,
}

impl EvaluatorOptions {
    /// Construct validated evaluator options.
    ///
    /// # Errors
    /// Returns [`EvalError::InvalidClipCeiling`] when the ceiling is
    /// non-finite or not strictly positive. The integration options carry
    /// their own validation in [`IntegrationOptions::new`].
    pub fn new(
        mode: PerturbationMode,
        ratio_ceiling: f64,
        integration: IntegrationOptions,
    ) -> EvalResult<Self> {
        if !ratio_ceiling.is_finite() {
            return Err(EvalError::InvalidClipCeiling {
                value: ratio_ceiling,
                reason: "Ceiling must be finite.",
            });
        }
        if ratio_ceiling <= 0.0 {
            return Err(EvalError::InvalidClipCeiling {
                value: ratio_ceiling,
                reason: "Ceiling must be positive.",
            });
        }
        Ok(Self { mode, ratio_ceiling, integration })
    }
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self {
            mode: PerturbationMode::default(),
            ratio_ceiling: DEFAULT_RATIO_CEILING,
            integration: IntegrationOptions::default(),
        }
    }
}

/// Outcome of one instrumented cost evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct CostReport {
    /// The scalar cost (least-squares residual sum).
    pub cost: Cost,
    /// Control trajectories actually integrated (cache misses).
    pub control_integrations: usize,
    /// Perturbed trajectories integrated (always the factor count).
    pub perturbed_integrations: usize,
    /// Control lookups served from the baseline cache.
    pub cache_hits: usize,
}

/// Sequential perturbation cost evaluator.
///
/// Owns the read-only configuration of one fitting problem: the shared
/// interaction mask, the initial state, the measurement dataset, and the
/// evaluator options. Construction performs every fatal configuration
/// check; afterwards the evaluator is safely callable any number of times,
/// including concurrently, because per-call state is evaluation-local.
#[derive(Debug, Clone)]
pub struct PerturbationEvaluator {
    layout: SolutionLayout,
    mask: Arc<InteractionMask>,
    y0: Array1<f64>,
    dataset: Arc<PerturbationDataset>,
    options: EvaluatorOptions,
}

impl PerturbationEvaluator {
    /// Construct a validated evaluator.
    ///
    /// # Errors
    /// - [`EvalError::Network`] wrapping an initial-state length or
    ///   finiteness failure.
    /// - [`EvalError::FactorCountExceedsNodes`] when the dataset declares
    ///   more perturbed factors than the network has nodes.
    pub fn new(
        mask: Arc<InteractionMask>,
        y0: Array1<f64>,
        dataset: Arc<PerturbationDataset>,
        options: EvaluatorOptions,
    ) -> EvalResult<Self> {
        let nodes = mask.nodes();
        validate_initial_state(y0.view(), nodes)?;
        if dataset.factors() > nodes {
            return Err(EvalError::FactorCountExceedsNodes {
                factors: dataset.factors(),
                nodes,
            });
        }
        let layout = SolutionLayout::new(nodes, mask.cardinality())?;
        Ok(Self { layout, mask, y0, dataset, options })
    }

    /// The candidate-vector layout this evaluator expects.
    pub fn layout(&self) -> &SolutionLayout {
        &self.layout
    }

    /// The measurement dataset this evaluator scores against.
    pub fn dataset(&self) -> &PerturbationDataset {
        &self.dataset
    }

    /// The evaluator configuration.
    pub fn options(&self) -> &EvaluatorOptions {
        &self.options
    }

    /// The shared interaction mask.
    pub fn mask(&self) -> &InteractionMask {
        &self.mask
    }

    /// Evaluate the perturbation cost of one candidate vector.
    ///
    /// # Errors
    /// Returns [`EvalError::Network`] wrapping a length mismatch when the
    /// candidate does not fit the layout. Numerical degeneracies never
    /// error; they surface as a large (clipped) cost.
    pub fn cost(&self, solution: &Solution) -> EvalResult<Cost> {
        self.cost_detailed(solution).map(|report| report.cost)
    }

    /// Evaluate the cost and report integration counters.
    ///
    /// See the module documentation for the algorithm and the semantics of
    /// [`PerturbationMode`].
    pub fn cost_detailed(&self, solution: &Solution) -> EvalResult<CostReport> {
        self.layout.check(solution)?;
        let factors = self.dataset.factors();

        // Per-call scratch: decoded interactions, working vector, cache.
        let nodes = self.layout.nodes();
        let segments = SolutionSegments::split(solution, &self.layout)?;
        let mut interactions = Array2::zeros((nodes, nodes));
        decode_interactions(&self.mask, segments.strengths, &mut interactions)?;

        let mut working = solution.clone();
        let mut cache = BaselineCache::new();
        let mut ratios = Array1::zeros(factors * factors);

        for i in 0..factors {
            let times = self.dataset.times(i);
            let last = times.len() - 1;

            let control_final: Array1<f64> = {
                let trace = cache
                    .get_or_insert_with(times, || self.simulate(&working, &interactions, times));
                trace.slice(s![last, ..factors]).to_owned()
            };

            let multiplier = 1.0 + self.dataset.magnitude(i);
            let perturbed = match self.options.mode {
                PerturbationMode::Compounding => {
                    working[i] *= multiplier;
                    self.simulate(&working, &interactions, times)
                }
                PerturbationMode::Independent => {
                    let mut private = working.clone();
                    private[i] *= multiplier;
                    self.simulate(&private, &interactions, times)
                }
            };

            for j in 0..factors {
                // A vanishing control value gives a huge or undefined
                // ratio; the fold step caps it, so nothing is trapped here.
                ratios[i * factors + j] = perturbed[(last, j)] / control_final[j];
            }
        }

        fold_ratios_into_residuals(&mut ratios, self.options.ratio_ceiling);
        let observed = self.dataset.magnitudes_flat();
        let cost = regression_residual_sum(ratios.view(), observed.view());

        Ok(CostReport {
            cost,
            control_integrations: cache.misses(),
            perturbed_integrations: factors,
            cache_hits: cache.hits(),
        })
    }

    /// Integrate the network under `vector` over `times`.
    ///
    /// Length invariants are established by the `cost_detailed` entry
    /// check, so this internal path is infallible.
    pub(crate) fn simulate(
        &self,
        vector: &Solution,
        interactions: &Array2<f64>,
        times: ArrayView1<'_, f64>,
    ) -> Trace {
        let n = self.layout.nodes();
        let rhs = RegulatoryRhs::new(
            vector.slice(s![..n]),
            vector.slice(s![n..2 * n]),
            interactions,
        );
        integrate_over(&rhs, self.y0.view(), times, &self.options.integration)
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
    // - The decoupled-network scenario: zero magnitude yields cost 0.
    // - Cache correctness: shared time sequences trigger one control
    //   integration, observable through `cost_detailed`.
    // - Bit-level determinism and finiteness of the cost.
    // - The compounding/independent divergence on a network where order
    //   matters.
    // - Construction-time rejection of bad configuration.
    //
    // They intentionally DO NOT cover:
    // - Integrator accuracy (tested in `network::integrate`).
    // - Clip arithmetic (tested in `evaluation::least_squares`).
    // -------------------------------------------------------------------------

    fn evaluator(
        nodes: usize,
        edges: &[(usize, usize)],
        y0: Array1<f64>,
        table: ndarray::Array2<f64>,
        mode: PerturbationMode,
    ) -> PerturbationEvaluator {
        let mask = Arc::new(InteractionMask::from_edges(nodes, edges).unwrap());
        let dataset = Arc::new(PerturbationDataset::new(table).unwrap());
        let options =
            EvaluatorOptions::new(mode, DEFAULT_RATIO_CEILING, IntegrationOptions::default())
                .unwrap();
        PerturbationEvaluator::new(mask, y0, dataset, options).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Two nodes joined by a single reaction of strength zero decouple into
    // independent relaxations. A single-row dataset with zero perturbation
    // magnitude applies the multiplier 1, so perturbed and control
    // trajectories are identical, every ratio is exactly 1, and the cost
    // must be exactly 0.
    fn decoupled_network_with_zero_magnitude_scores_zero() {
        let table = array![[0.0, 0.0, 0.5, 1.0]];
        let eval = evaluator(
            2,
            &[(0, 1)],
            array![1.0, 2.0],
            table,
            PerturbationMode::Independent,
        );
        let solution = array![1.0, 1.0, 1.0, 1.0, 0.0];

        let cost = eval.cost(&solution).unwrap();

        assert_eq!(cost, 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Two factors declaring bit-identical time sequences must share one
    // control integration; the cache key is the sequence content, not the
    // factor index.
    //
    // Given
    // -----
    // - A two-node network and a two-row dataset whose time columns match.
    //
    // Expect
    // ------
    // - Exactly 1 control integration, 1 cache hit, 2 perturbed
    //   integrations.
    fn shared_time_sequences_hit_the_baseline_cache() {
        let table = array![
            [0.3, 0.0, 0.0, 0.5, 1.0],
            [0.0, -0.4, 0.0, 0.5, 1.0],
        ];
        let eval = evaluator(
            2,
            &[(0, 1), (1, 0)],
            array![1.0, 1.0],
            table,
            PerturbationMode::Independent,
        );
        let solution = array![1.0, 0.5, 2.0, 1.0, 1.5, -0.5];

        let report = eval.cost_detailed(&solution).unwrap();

        assert_eq!(report.control_integrations, 1);
        assert_eq!(report.cache_hits, 1);
        assert_eq!(report.perturbed_integrations, 2);
        assert!(report.cost.is_finite());
    }

    #[test]
    fn distinct_time_sequences_integrate_separate_controls() {
        let table = array![
            [0.3, 0.0, 0.0, 0.5, 1.0],
            [0.0, -0.4, 0.0, 0.5, 2.0],
        ];
        let eval = evaluator(
            2,
            &[(0, 1)],
            array![1.0, 1.0],
            table,
            PerturbationMode::Independent,
        );
        let solution = array![1.0, 0.5, 2.0, 1.0, 1.5];

        let report = eval.cost_detailed(&solution).unwrap();

        assert_eq!(report.control_integrations, 2);
        assert_eq!(report.cache_hits, 0);
    }

    #[test]
    // Purpose
    // -------
    // Two calls with a bit-identical candidate on the same evaluator must
    // produce bit-identical costs.
    fn repeated_evaluation_is_bit_identical() {
        let table = array![
            [0.5, 0.1, 0.0, 0.4, 0.8],
            [-0.1, -0.6, 0.0, 0.4, 0.8],
        ];
        let eval = evaluator(
            2,
            &[(0, 1), (1, 1)],
            array![0.8, 1.2],
            table,
            PerturbationMode::Independent,
        );
        let solution = array![0.9, 1.1, 1.5, 0.7, 2.0, -1.0];

        let a = eval.cost(&solution).unwrap();
        let b = eval.cost(&solution).unwrap();

        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn cost_is_finite_and_non_negative_for_plausible_candidates() {
        let table = array![
            [0.5, 0.1, 0.0, 0.4, 0.8],
            [-0.1, -0.6, 0.0, 0.4, 0.8],
        ];
        let eval = evaluator(
            2,
            &[(0, 1), (1, 0)],
            array![0.8, 1.2],
            table,
            PerturbationMode::Independent,
        );

        for solution in [
            array![0.9, 1.1, 1.5, 0.7, 2.0, -1.0],
            array![0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            array![20.0, 20.0, 20.0, 20.0, 20.0, -20.0],
        ] {
            let cost = eval.cost(&solution).unwrap();
            assert!(cost.is_finite(), "cost must be finite, got {cost}");
            assert!(cost >= 0.0, "cost must be non-negative, got {cost}");
        }
    }

    #[test]
    // Purpose
    // -------
    // On a coupled network with non-trivial magnitudes, compounding and
    // independent semantics must diverge: iteration 1 sees a mutated entry
    // 0 only in compounding mode.
    fn compounding_and_independent_modes_diverge() {
        let table = array![
            [0.8, 0.0, 0.0, 0.5, 1.0],
            [0.0, -0.5, 0.0, 0.6, 1.2],
        ];
        let solution = array![1.0, 0.5, 2.0, 1.0, 1.5, -0.5];

        let independent = evaluator(
            2,
            &[(0, 1), (1, 0)],
            array![1.0, 1.0],
            table.clone(),
            PerturbationMode::Independent,
        )
        .cost(&solution)
        .unwrap();
        let compounding = evaluator(
            2,
            &[(0, 1), (1, 0)],
            array![1.0, 1.0],
            table,
            PerturbationMode::Compounding,
        )
        .cost(&solution)
        .unwrap();

        assert_ne!(independent.to_bits(), compounding.to_bits());
    }

    #[test]
    fn wrong_candidate_length_is_rejected_per_call() {
        let table = array![[0.0, 0.0, 0.5, 1.0]];
        let eval = evaluator(
            2,
            &[(0, 1)],
            array![1.0, 2.0],
            table,
            PerturbationMode::Independent,
        );
        let too_short = array![1.0, 1.0, 1.0];
        assert!(matches!(
            eval.cost(&too_short),
            Err(EvalError::Network(
                crate::network::errors::NetworkError::SolutionLengthMismatch { expected: 5, actual: 3 }
            ))
        ));
    }

    #[test]
    fn construction_rejects_mismatched_initial_state() {
        let mask = Arc::new(InteractionMask::from_edges(2, &[(0, 1)]).unwrap());
        let dataset =
            Arc::new(PerturbationDataset::new(array![[0.0, 0.0, 0.5, 1.0]]).unwrap());
        let result = PerturbationEvaluator::new(
            mask,
            array![1.0, 2.0, 3.0],
            dataset,
            EvaluatorOptions::default(),
        );
        assert!(matches!(result, Err(EvalError::Network(_))));
    }

    #[test]
    fn construction_rejects_more_factors_than_nodes() {
        let mask = Arc::new(InteractionMask::from_edges(1, &[(0, 0)]).unwrap());
        let table = array![
            [0.1, 0.0, 0.0, 0.5, 1.0],
            [0.0, 0.2, 0.0, 0.5, 1.0],
        ];
        let dataset = Arc::new(PerturbationDataset::new(table).unwrap());
        let result = PerturbationEvaluator::new(
            mask,
            array![1.0],
            dataset,
            EvaluatorOptions::default(),
        );
        assert_eq!(
            result.err(),
            Some(EvalError::FactorCountExceedsNodes { factors: 2, nodes: 1 })
        );
    }
}
