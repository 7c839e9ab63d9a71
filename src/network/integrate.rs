//! Integrator adapter: adaptive Runge-Kutta over a measurement time grid.
//!
//! Purpose
//! -------
//! Drive a Dormand-Prince 4(5) solver across an ascending time sequence and
//! return one trajectory row per requested point. This is the only place
//! the crate touches numerical integration; evaluators treat it as a black
//! box that always returns a trace.
//!
//! Key behaviors
//! -------------
//! - Adaptive step-size control (PI controller) with an embedded error
//!   estimate; the accepted 5th-order solution advances the state (local
//!   extrapolation) and the FSAL property reuses the last stage.
//! - A single internal step budget is shared across the whole sequence.
//!   When a pathological parameter combination exhausts it, the remaining
//!   rows are filled with the last reached state and the trace is returned
//!   as-is: a best-effort, possibly inaccurate result that the downstream
//!   cost computation penalizes naturally. Exhaustion is never an error and
//!   can never hang.
//! - Identical inputs produce bit-identical traces; the implementation is
//!   pure `f64` arithmetic with no global state.
//!
//! Invariants & assumptions
//! ------------------------
//! - `times` is ascending and `y0.len() == sys.ndim()`; both are enforced
//!   when the surrounding problem is constructed, not here.
//! - [`IntegrationOptions`] are validated on construction and treated as
//!   internally consistent afterwards.
//!
//! Conventions
//! -----------
//! - Row 0 of the trace is the initial state at `times[0]`; integration
//!   proceeds segment by segment between consecutive requested points.
//! - This module performs no I/O and emits no logging.

use crate::network::{
    core::validation::{validate_step_budget, validate_tolerance},
    errors::NetworkResult,
    ode::OdeSystem,
    types::Trace,
};
use ndarray::{aview1, Array2, ArrayView1};

/// Default internal step budget, mirroring the classical `mxstep = 1e8`
/// ceiling of stiff-capable library solvers.
pub const DEFAULT_STEP_BUDGET: usize = 100_000_000;

/// Configuration for the adaptive integrator.
///
/// Fields:
/// - `rtol` / `atol`: relative and absolute local-error tolerances.
/// - `h_min`: floor on the step size, keeping the controller from
///   collapsing to a zero step on hard segments.
/// - `max_steps`: shared budget of attempted steps across the whole time
///   sequence; see the module documentation for exhaustion behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationOptions {
    pub rtol: f64,
    pub atol: f64,
    pub h_min: f64,
    pub max_steps: usize,
}

impl IntegrationOptions {
    /// Construct validated integrator options.
    ///
    /// # Errors
    /// - [`crate::network::errors::NetworkError::InvalidTolerance`] when
    ///   `rtol`, `atol`, or `h_min` is non-finite or not strictly positive.
    /// - [`crate::network::errors::NetworkError::InvalidStepBudget`] when
    ///   `max_steps == 0`.
    pub fn new(rtol: f64, atol: f64, h_min: f64, max_steps: usize) -> NetworkResult<Self> {
        validate_tolerance(rtol, "Relative tolerance must be finite and positive.")?;
        validate_tolerance(atol, "Absolute tolerance must be finite and positive.")?;
        validate_tolerance(h_min, "Minimum step size must be finite and positive.")?;
        validate_step_budget(max_steps)?;
        Ok(Self { rtol, atol, h_min, max_steps })
    }
}

impl Default for IntegrationOptions {
    fn default() -> Self {
        Self { rtol: 1e-6, atol: 1e-9, h_min: 1e-14, max_steps: DEFAULT_STEP_BUDGET }
    }
}

// Dormand-Prince 4(5) tableau.
const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// 4th-order weights (error reference).
const B1: f64 = 5179.0 / 57600.0;
const B3: f64 = 7571.0 / 16695.0;
const B4: f64 = 393.0 / 640.0;
const B5: f64 = -92097.0 / 339200.0;
const B6: f64 = 187.0 / 2100.0;
const B7: f64 = 1.0 / 40.0;

// 5th-order weights (advancing solution).
const BH1: f64 = 35.0 / 384.0;
const BH3: f64 = 500.0 / 1113.0;
const BH4: f64 = 125.0 / 192.0;
const BH5: f64 = -2187.0 / 6784.0;
const BH6: f64 = 11.0 / 84.0;

// Error = y5 - y4.
const E1: f64 = BH1 - B1;
const E3: f64 = BH3 - B3;
const E4: f64 = BH4 - B4;
const E5: f64 = BH5 - B5;
const E6: f64 = BH6 - B6;
const E7: f64 = -B7;

/// Integrate `sys` from `y0` across an ascending time sequence.
///
/// Returns a trace with `times.len()` rows and `sys.ndim()` columns; row
/// `r` is the state at `times[r]`. On step-budget exhaustion the remaining
/// rows repeat the last reached state (best-effort output, never an error).
pub fn integrate_over<S: OdeSystem>(
    sys: &S,
    y0: ArrayView1<'_, f64>,
    times: ArrayView1<'_, f64>,
    opts: &IntegrationOptions,
) -> Trace {
    let n = sys.ndim();
    let rows = times.len();
    let mut trace = Array2::zeros((rows, n));
    if rows == 0 {
        return trace;
    }

    let mut y: Vec<f64> = y0.to_vec();
    trace.row_mut(0).assign(&aview1(&y));
    if rows == 1 {
        return trace;
    }

    let mut k1 = vec![0.0; n];
    let mut k2 = vec![0.0; n];
    let mut k3 = vec![0.0; n];
    let mut k4 = vec![0.0; n];
    let mut k5 = vec![0.0; n];
    let mut k6 = vec![0.0; n];
    let mut k7 = vec![0.0; n];
    let mut y_tmp = vec![0.0; n];
    let mut y_new = vec![0.0; n];

    let mut t = times[0];
    let span = times[rows - 1] - t;
    let mut h = (span * 1e-3).max(opts.h_min);
    let mut budget = opts.max_steps;

    sys.rhs(t, &y, &mut k1);

    for seg in 1..rows {
        let t_target = times[seg];

        while t < t_target {
            if budget == 0 {
                // Best-effort exit: freeze the trajectory at the last
                // reached state for every remaining requested point.
                for r in seg..rows {
                    trace.row_mut(r).assign(&aview1(&y));
                }
                return trace;
            }
            budget -= 1;
            h = h.max(opts.h_min).min(t_target - t);

            for i in 0..n {
                y_tmp[i] = y[i] + h * A21 * k1[i];
            }
            sys.rhs(t + h / 5.0, &y_tmp, &mut k2);

            for i in 0..n {
                y_tmp[i] = y[i] + h * (A31 * k1[i] + A32 * k2[i]);
            }
            sys.rhs(t + 3.0 * h / 10.0, &y_tmp, &mut k3);

            for i in 0..n {
                y_tmp[i] = y[i] + h * (A41 * k1[i] + A42 * k2[i] + A43 * k3[i]);
            }
            sys.rhs(t + 4.0 * h / 5.0, &y_tmp, &mut k4);

            for i in 0..n {
                y_tmp[i] = y[i] + h * (A51 * k1[i] + A52 * k2[i] + A53 * k3[i] + A54 * k4[i]);
            }
            sys.rhs(t + 8.0 * h / 9.0, &y_tmp, &mut k5);

            for i in 0..n {
                y_tmp[i] = y[i]
                    + h * (A61 * k1[i] + A62 * k2[i] + A63 * k3[i] + A64 * k4[i] + A65 * k5[i]);
            }
            sys.rhs(t + h, &y_tmp, &mut k6);

            // 5th-order candidate (local extrapolation).
            for i in 0..n {
                y_new[i] = y[i]
                    + h * (BH1 * k1[i] + BH3 * k3[i] + BH4 * k4[i] + BH5 * k5[i] + BH6 * k6[i]);
            }

            // FSAL stage.
            sys.rhs(t + h, &y_new, &mut k7);

            let mut err_norm = 0.0;
            for i in 0..n {
                let ei = h
                    * (E1 * k1[i]
                        + E3 * k3[i]
                        + E4 * k4[i]
                        + E5 * k5[i]
                        + E6 * k6[i]
                        + E7 * k7[i]);
                let sc = opts.atol + opts.rtol * y[i].abs().max(y_new[i].abs());
                err_norm += (ei / sc) * (ei / sc);
            }
            err_norm = (err_norm / n as f64).sqrt();

            if err_norm <= 1.0 {
                t += h;
                y.copy_from_slice(&y_new);
                k1.copy_from_slice(&k7);
            }

            // PI controller; a non-finite error estimate (diverging state)
            // forces the maximum shrink instead of poisoning the step size.
            let factor = if !err_norm.is_finite() {
                0.2
            } else if err_norm == 0.0 {
                5.0
            } else {
                (0.9 * err_norm.powf(-0.2)).min(5.0).max(0.2)
            };
            h = (h * factor).max(opts.h_min);
        }

        trace.row_mut(seg).assign(&aview1(&y));
    }

    trace
}
