//! Helper functions shared by detectors
//!
//! Summary statistics and guarded loops over sequences.

use induct_core::{TimeoutError, TimeoutGuard};

/// Stabilizing epsilon for divisions by possibly-zero quantities
pub const NUMERICAL_STABILITY_THRESHOLD: f64 = 1e-10;

/// Divide by a non-negative quantity that may be zero.
///
/// `epsilon` keeps the denominator away from zero; callers pass magnitudes
/// (means of absolute values, absolute means, tolerances).
pub fn safe_ratio(numerator: f64, denominator: f64, epsilon: f64) -> f64 {
    debug_assert!(denominator >= 0.0, "safe_ratio expects a non-negative denominator");
    numerator / (denominator + epsilon)
}

/// Arithmetic mean, zero for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean of absolute values
pub fn mean_abs(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| v.abs()).sum::<f64>() / values.len() as f64
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Consecutive differences `s[i+1] - s[i]`
pub fn differences(sequence: &[f64], guard: &TimeoutGuard) -> Result<Vec<f64>, TimeoutError> {
    let mut diffs = Vec::with_capacity(sequence.len().saturating_sub(1));
    for (i, pair) in sequence.windows(2).enumerate() {
        guard.checkpoint_at(i)?;
        diffs.push(pair[1] - pair[0]);
    }
    Ok(diffs)
}

/// Mean absolute error between data and a reconstruction
pub fn mean_abs_error(actual: &[f64], fitted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    actual
        .iter()
        .zip(fitted)
        .map(|(a, f)| (a - f).abs())
        .sum::<f64>()
        / actual.len() as f64
}
