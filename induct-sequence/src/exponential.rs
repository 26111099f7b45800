//! Exponential growth `a · bⁿ`
//!
//! Fits `ln y` against 0-indexed positions with ordinary least squares, so
//! only strictly positive sequences qualify.

use crate::confidence::exponential_confidence;
use induct_core::{EngineError, PatternKind, PatternMatch, TimeoutGuard, ToleranceConfig};
use induct_plugin::{DetectorMeta, PatternDetector};

/// Slope and intercept of the least-squares line through `(x, y)`
fn linear_regression(x: &[f64], y: &[f64], guard: &TimeoutGuard) -> Result<(f64, f64), EngineError> {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut sum_xy_dev = 0.0;
    let mut sum_xx_dev = 0.0;
    for (i, (xi, yi)) in x.iter().zip(y).enumerate() {
        guard.checkpoint_at(i)?;
        sum_xy_dev += (xi - mean_x) * (yi - mean_y);
        sum_xx_dev += (xi - mean_x) * (xi - mean_x);
    }

    // slope = Σ(x-x̄)(y-ȳ) / Σ(x-x̄)²
    let slope = if sum_xx_dev == 0.0 { 0.0 } else { sum_xy_dev / sum_xx_dev };
    // intercept = ȳ - slope * x̄
    let intercept = mean_y - slope * mean_x;
    Ok((slope, intercept))
}

/// `1 - relative_error / rtol`, floored at zero
fn match_score(relative_error: f64, relative_tolerance: f64) -> f64 {
    if relative_tolerance == 0.0 {
        return if relative_error == 0.0 { 1.0 } else { 0.0 };
    }
    (1.0 - relative_error / relative_tolerance).max(0.0)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialDetector;

impl PatternDetector for ExponentialDetector {
    fn meta(&self) -> DetectorMeta {
        DetectorMeta {
            name: "exponential",
            description: "Positive terms growing or decaying by a constant factor",
            min_length: 4,
            detects: &["exponential"],
        }
    }

    fn detect(
        &self,
        sequence: &[f64],
        tolerance: &ToleranceConfig,
        guard: &TimeoutGuard,
    ) -> Result<Option<PatternMatch>, EngineError> {
        if sequence.len() < 4 || sequence.iter().any(|&y| y <= 0.0) {
            return Ok(None);
        }

        let x: Vec<f64> = (0..sequence.len()).map(|i| i as f64).collect();
        let log_y: Vec<f64> = sequence.iter().map(|y| y.ln()).collect();
        let (log_b, log_a) = linear_regression(&x, &log_y, guard)?;

        let fitted: Vec<f64> = x.iter().map(|xi| (log_a + log_b * xi).exp()).collect();
        if !tolerance.all_close(sequence, &fitted) {
            return Ok(None);
        }

        let relative_error = sequence
            .iter()
            .zip(&fitted)
            .map(|(y, f)| ((y - f) / y).abs())
            .sum::<f64>()
            / sequence.len() as f64;
        let score = match_score(relative_error, tolerance.relative_tolerance);

        let a = log_a.exp();
        let b = log_b.exp();
        let next = (log_a + log_b * sequence.len() as f64).exp();

        Ok(Some(PatternMatch::new(
            PatternKind::Exponential { base: b, coefficient: a, match_score: score },
            next,
            exponential_confidence(score),
            format!("Exponential: {:.3} * {:.3}^n", a, b),
        )))
    }
}
