//! Numerical stability utilities.
//!
//! Provides a guarded implementation of the logistic production transform
//! that is prone to overflow in naïve form. The function here follows the
//! same guarded strategy used for softplus-style transforms in major ML
//! libraries, with an explicit cutoff that keeps `f64` arithmetic in a
//! well-conditioned regime.
//!
//! # Provided items
//! - [`SATURATION_CUTOFF`]: drive magnitude beyond which the logistic is
//!   numerically indistinguishable from its asymptote in `f64`.
//! - [`saturating_logistic(x)`]: stable version of `1 / (1 + exp(-x))`,
//!   mapping ℝ → (0, 1) without trapping on exponential overflow.
//!
//! # Rationale
//! The regulatory production term saturates through a logistic in the
//! weighted regulator drive. Candidate parameter vectors explored by a
//! global optimizer routinely push that drive to ±10⁴ and beyond, so the
//! transform must collapse cleanly to 0 or 1 under overflow instead of
//! raising or producing NaN.

/// Drive magnitude beyond which the logistic has saturated in `f64`.
///
/// `exp(-36.7) ≈ 1.1e-16`, below the `f64` epsilon, so past this cutoff
/// the quotient rounds to the asymptote anyway. Short-circuiting keeps the
/// evaluation cheap and avoids forming extreme intermediate exponentials.
pub const SATURATION_CUTOFF: f64 = 36.7;

/// Numerically stable logistic: `sigma(x) = 1 / (1 + exp(-x))`.
///
/// Computes the logistic without trapping for any finite or infinite `x`:
///
/// - For `x > SATURATION_CUTOFF`, the result is exactly `1.0`.
/// - For very negative `x`, `exp(-x)` overflows to `+inf` and the quotient
///   collapses to `0.0`, which is the intended saturated production level.
/// - `x = 0` yields exactly `0.5`.
///
/// # Parameters
/// - `x`: regulator drive (weighted sum of regulator states).
///
/// # Returns
/// - `sigma(x)` in `[0, 1]`; never NaN for non-NaN input.
pub fn saturating_logistic(x: f64) -> f64 {
    if x > SATURATION_CUTOFF {
        1.0
    } else {
        // exp(-x) may overflow to +inf for strongly negative drives; the
        // division then yields 0.0, the saturated "production off" level.
        1.0 / (1.0 + (-x).exp())
    }
}
