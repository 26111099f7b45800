//! Polynomial sequences
//!
//! Least-squares fits of increasing degree against 1-indexed positions.
//! The best fit above the acceptance threshold wins; exact squares and
//! cubes are reported by name.

use crate::confidence::polynomial_confidence;
use induct_core::{
    EngineError, PatternKind, PatternMatch, PolynomialShape, TimeoutGuard, ToleranceConfig,
    DEFAULT_MAX_POLYNOMIAL_DEGREE,
};
use induct_plugin::{DetectorMeta, PatternDetector};
use nalgebra::{DMatrix, DVector};
use tracing::trace;

/// Fits at or below this r² are rejected
pub const R_SQUARED_THRESHOLD: f64 = 0.95;

/// r² gains smaller than this are treated as ties
pub const R_SQUARED_TIE_EPSILON: f64 = 1e-12;

/// Singular values below this are treated as zero in the SVD solve
const SVD_EPSILON: f64 = 1e-10;

/// A least-squares polynomial fit
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialFit {
    pub degree: usize,
    /// Highest power first
    pub coefficients: Vec<f64>,
    pub r_squared: f64,
}

impl PolynomialFit {
    /// Horner evaluation at `x`
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
    }

    pub fn shape(&self) -> PolynomialShape {
        let tol = ToleranceConfig::COEFFICIENT;
        match self.degree {
            2 if tol.all_close(&self.coefficients, &[1.0, 0.0, 0.0]) => PolynomialShape::PerfectSquares,
            3 if tol.all_close(&self.coefficients, &[1.0, 0.0, 0.0, 0.0]) => PolynomialShape::PerfectCubes,
            _ => PolynomialShape::General,
        }
    }
}

/// Fit `sequence[i]` against `x = i + 1` with a polynomial of `degree`.
///
/// Returns `None` when the SVD solve fails.
pub fn fit_polynomial(sequence: &[f64], degree: usize, guard: &TimeoutGuard) -> Result<Option<PolynomialFit>, EngineError> {
    let n = sequence.len();
    let cols = degree + 1;
    let vandermonde = DMatrix::from_fn(n, cols, |i, j| ((i + 1) as f64).powi((degree - j) as i32));
    let b = DVector::from_column_slice(sequence);

    let svd = vandermonde.svd(true, true);
    let solution = match svd.solve(&b, SVD_EPSILON) {
        Ok(x) => x,
        Err(reason) => {
            trace!(degree, reason, "least squares solve failed");
            return Ok(None);
        }
    };
    let coefficients: Vec<f64> = solution.iter().copied().collect();

    let mean = sequence.iter().sum::<f64>() / n as f64;
    let mut fit = PolynomialFit { degree, coefficients, r_squared: 0.0 };
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (i, &y) in sequence.iter().enumerate() {
        guard.checkpoint_at(i)?;
        let predicted = fit.evaluate((i + 1) as f64);
        ss_res += (y - predicted) * (y - predicted);
        ss_tot += (y - mean) * (y - mean);
    }

    fit.r_squared = if ss_tot == 0.0 { 0.0 } else { 1.0 - ss_res / ss_tot };
    Ok(Some(fit))
}

/// Polynomial of degree 1 up to a configurable maximum
#[derive(Debug, Clone, Copy)]
pub struct PolynomialDetector {
    max_degree: usize,
}

impl Default for PolynomialDetector {
    fn default() -> Self {
        Self { max_degree: DEFAULT_MAX_POLYNOMIAL_DEGREE }
    }
}

impl PolynomialDetector {
    pub fn new(max_degree: usize) -> Self {
        Self { max_degree: max_degree.max(1) }
    }

    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Best accepted fit; ties keep the lower degree
    pub fn best_fit(&self, sequence: &[f64], guard: &TimeoutGuard) -> Result<Option<PolynomialFit>, EngineError> {
        let mut best: Option<PolynomialFit> = None;

        for degree in 1..=self.max_degree {
            if sequence.len() < degree + 2 {
                break;
            }
            guard.checkpoint()?;

            let Some(fit) = fit_polynomial(sequence, degree, guard)? else {
                continue;
            };
            trace!(degree, r_squared = fit.r_squared, "polynomial fit");
            if fit.r_squared <= R_SQUARED_THRESHOLD {
                continue;
            }

            let better = match &best {
                None => true,
                Some(current) => fit.r_squared > current.r_squared + R_SQUARED_TIE_EPSILON,
            };
            if better {
                best = Some(fit);
            }
        }

        Ok(best)
    }
}

fn describe(fit: &PolynomialFit, shape: PolynomialShape) -> String {
    let c = &fit.coefficients;
    match (shape, fit.degree) {
        (PolynomialShape::PerfectSquares, _) => "Perfect squares (n²)".to_string(),
        (PolynomialShape::PerfectCubes, _) => "Perfect cubes (n³)".to_string(),
        (_, 2) => format!("Quadratic: {:.3}n² + {:.3}n + {:.3}", c[0], c[1], c[2]),
        (_, 3) => format!("Cubic: {:.3}n³ + {:.3}n² + {:.3}n + {:.3}", c[0], c[1], c[2], c[3]),
        (_, d) => format!("Polynomial of degree {}", d),
    }
}

impl PatternDetector for PolynomialDetector {
    fn meta(&self) -> DetectorMeta {
        DetectorMeta {
            name: "polynomial",
            description: "Least-squares polynomial in the term index",
            min_length: self.max_degree + 2,
            detects: &["perfect_squares", "perfect_cubes", "quadratic", "cubic", "polynomial_degree_N"],
        }
    }

    fn detect(
        &self,
        sequence: &[f64],
        _tolerance: &ToleranceConfig,
        guard: &TimeoutGuard,
    ) -> Result<Option<PatternMatch>, EngineError> {
        if sequence.len() < self.max_degree + 2 {
            return Ok(None);
        }

        let Some(fit) = self.best_fit(sequence, guard)? else {
            return Ok(None);
        };

        let shape = fit.shape();
        let next = fit.evaluate((sequence.len() + 1) as f64);
        let confidence = polynomial_confidence(sequence.len(), fit.r_squared, fit.degree);
        let description = describe(&fit, shape);

        Ok(Some(PatternMatch::new(
            PatternKind::Polynomial {
                degree: fit.degree,
                coefficients: fit.coefficients,
                r_squared: fit.r_squared,
                shape,
            },
            next,
            confidence,
            description,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(seq: &[f64]) -> Option<PatternMatch> {
        PolynomialDetector::default()
            .detect(seq, &ToleranceConfig::default(), &TimeoutGuard::default())
            .unwrap()
    }

    #[test]
    fn test_horner() {
        let fit = PolynomialFit { degree: 2, coefficients: vec![2.0, -3.0, 1.0], r_squared: 1.0 };
        assert_eq!(fit.evaluate(0.0), 1.0);
        assert_eq!(fit.evaluate(2.0), 3.0);
    }

    #[test]
    fn test_perfect_squares() {
        let m = detect(&[1.0, 4.0, 9.0, 16.0, 25.0]).unwrap();
        assert_eq!(m.pattern_type(), "perfect_squares");
        assert_eq!(m.description, "Perfect squares (n²)");
        assert!((m.predicted_next - 36.0).abs() < 1e-6);
        assert!((m.confidence - 0.85 / 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_perfect_cubes() {
        let m = detect(&[1.0, 8.0, 27.0, 64.0, 125.0, 216.0]).unwrap();
        assert_eq!(m.pattern_type(), "perfect_cubes");
        assert!((m.predicted_next - 343.0).abs() < 1e-5);
    }

    #[test]
    fn test_general_quadratic() {
        // n² + n + 1
        let seq: Vec<f64> = (1..=6).map(|n| (n * n + n + 1) as f64).collect();
        let m = detect(&seq).unwrap();
        assert_eq!(m.pattern_type(), "quadratic");
        assert!((m.predicted_next - 57.0).abs() < 1e-6);
        assert_eq!(m.description, "Quadratic: 1.000n² + 1.000n + 1.000");
    }

    #[test]
    fn test_linear_is_degree_one() {
        let m = detect(&[3.0, 5.0, 7.0, 9.0, 11.0]).unwrap();
        assert_eq!(m.pattern_type(), "polynomial_degree_1");
        assert!((m.predicted_next - 13.0).abs() < 1e-6);
    }

    #[test]
    fn test_constant_has_no_fit() {
        assert!(detect(&[4.0, 4.0, 4.0, 4.0, 4.0]).is_none());
    }

    #[test]
    fn test_too_short() {
        assert!(detect(&[1.0, 4.0, 9.0, 16.0]).is_none());
        let quadratic_only = PolynomialDetector::new(2)
            .detect(&[1.0, 4.0, 9.0, 16.0], &ToleranceConfig::default(), &TimeoutGuard::default())
            .unwrap()
            .unwrap();
        assert_eq!(quadratic_only.pattern_type(), "perfect_squares");
    }

    #[test]
    fn test_noise_rejected() {
        assert!(detect(&[5.0, -3.0, 8.0, 0.0, 9.0, -7.0]).is_none());
    }

    #[test]
    fn test_r_squared_zero_for_constant() {
        let fit = fit_polynomial(&[2.0, 2.0, 2.0], 1, &TimeoutGuard::default()).unwrap().unwrap();
        assert_eq!(fit.r_squared, 0.0);
    }
}
