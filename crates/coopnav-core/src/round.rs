//! Fixed-decimal rounding helpers.
//!
//! Outcome probabilities are stored and compared at fixed decimal precision
//! so that repeated scaling (heat mapping) and re-partitioning (probability
//! synthesis) cannot accumulate drift past the `success + return + fail = 1`
//! invariant.  Five decimal places is the working precision for transition
//! probabilities; validated path probabilities compare at the same.

/// Tolerance for probability-sum invariants.
pub const PROB_EPSILON: f64 = 1e-6;

/// Working precision for transition probabilities.
pub const PROB_DECIMALS: u32 = 5;

/// Round `x` to `decimals` decimal places (half away from zero, like
/// `f64::round`).
#[inline]
pub fn round_dp(x: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (x * scale).round() / scale
}

/// Number of digits after the decimal point in the shortest representation
/// of `x`, capped at `max`.  `0.95` → 2, `0.4` → 1, `1.0` → 0.
pub fn decimal_places(x: f64, max: u32) -> u32 {
    let s = format!("{x}");
    match s.find('.') {
        None => 0,
        Some(dot) => ((s.len() - dot - 1) as u32).min(max),
    }
}

/// `true` when `a` and `b` agree within [`PROB_EPSILON`].
#[inline]
pub fn prob_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= PROB_EPSILON
}
