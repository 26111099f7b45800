//! Arithmetic and geometric progressions

use crate::confidence::{
    progression_confidence, PatternFamily, BASE_CONFIDENCE_ARITHMETIC, BASE_CONFIDENCE_GEOMETRIC,
};
use crate::helpers::differences;
use induct_core::{format_value, EngineError, PatternKind, PatternMatch, TimeoutGuard, ToleranceConfig};
use induct_plugin::{DetectorMeta, PatternDetector};

/// Ratios are clamped to this magnitude before comparison
pub const GEOMETRIC_RATIO_LIMIT: f64 = 1e6;

/// Constant first differences
#[derive(Debug, Clone, Copy)]
pub struct ArithmeticDetector {
    base_confidence: f64,
}

impl Default for ArithmeticDetector {
    fn default() -> Self {
        Self { base_confidence: BASE_CONFIDENCE_ARITHMETIC }
    }
}

impl ArithmeticDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_confidence(mut self, base_confidence: f64) -> Self {
        self.base_confidence = base_confidence;
        self
    }
}

impl PatternDetector for ArithmeticDetector {
    fn meta(&self) -> DetectorMeta {
        DetectorMeta {
            name: "arithmetic",
            description: "Constant difference between consecutive terms",
            min_length: 2,
            detects: &["arithmetic"],
        }
    }

    fn detect(
        &self,
        sequence: &[f64],
        tolerance: &ToleranceConfig,
        guard: &TimeoutGuard,
    ) -> Result<Option<PatternMatch>, EngineError> {
        if sequence.len() < 2 {
            return Ok(None);
        }

        let diffs = differences(sequence, guard)?;
        let d = diffs[0];
        if !tolerance.all_close_to(&diffs, d) {
            return Ok(None);
        }

        let confidence =
            progression_confidence(&diffs, sequence.len(), PatternFamily::Arithmetic, self.base_confidence);
        let last = sequence[sequence.len() - 1];

        Ok(Some(PatternMatch::new(
            PatternKind::Arithmetic { common_difference: d },
            last + d,
            confidence,
            format!("Arithmetic progression with common difference: {}", format_value(d)),
        )))
    }
}

/// Constant ratio between consecutive terms
#[derive(Debug, Clone, Copy)]
pub struct GeometricDetector {
    base_confidence: f64,
}

impl Default for GeometricDetector {
    fn default() -> Self {
        Self { base_confidence: BASE_CONFIDENCE_GEOMETRIC }
    }
}

impl GeometricDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_confidence(mut self, base_confidence: f64) -> Self {
        self.base_confidence = base_confidence;
        self
    }
}

impl PatternDetector for GeometricDetector {
    fn meta(&self) -> DetectorMeta {
        DetectorMeta {
            name: "geometric",
            description: "Constant ratio between consecutive terms",
            min_length: 2,
            detects: &["geometric"],
        }
    }

    fn detect(
        &self,
        sequence: &[f64],
        tolerance: &ToleranceConfig,
        guard: &TimeoutGuard,
    ) -> Result<Option<PatternMatch>, EngineError> {
        if sequence.len() < 2 || sequence.iter().any(|&x| x == 0.0) {
            return Ok(None);
        }

        let mut ratios = Vec::with_capacity(sequence.len() - 1);
        for (i, pair) in sequence.windows(2).enumerate() {
            guard.checkpoint_at(i)?;
            ratios.push((pair[1] / pair[0]).clamp(-GEOMETRIC_RATIO_LIMIT, GEOMETRIC_RATIO_LIMIT));
        }

        let r = ratios[0];
        if !tolerance.all_close_to(&ratios, r) {
            return Ok(None);
        }

        let confidence =
            progression_confidence(&ratios, sequence.len(), PatternFamily::Geometric, self.base_confidence);
        let last = sequence[sequence.len() - 1];

        Ok(Some(PatternMatch::new(
            PatternKind::Geometric { common_ratio: r },
            last * r,
            confidence,
            format!("Geometric progression with common ratio: {}", format_value(r)),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arithmetic(seq: &[f64]) -> Option<PatternMatch> {
        ArithmeticDetector::new()
            .detect(seq, &ToleranceConfig::default(), &TimeoutGuard::default())
            .unwrap()
    }

    fn geometric(seq: &[f64]) -> Option<PatternMatch> {
        GeometricDetector::new()
            .detect(seq, &ToleranceConfig::default(), &TimeoutGuard::default())
            .unwrap()
    }

    #[test]
    fn test_arithmetic_basic() {
        let m = arithmetic(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(m.predicted_next, 6.0);
        assert!(m.confidence > 0.9);
        assert_eq!(m.kind, PatternKind::Arithmetic { common_difference: 1.0 });
        assert_eq!(m.description, "Arithmetic progression with common difference: 1");
    }

    #[test]
    fn test_arithmetic_decreasing() {
        let m = arithmetic(&[10.0, 7.0, 4.0, 1.0]).unwrap();
        assert_eq!(m.predicted_next, -2.0);
    }

    #[test]
    fn test_arithmetic_constant_zero() {
        let m = arithmetic(&[0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(m.predicted_next, 0.0);
        assert!(m.confidence > 0.9);
    }

    #[test]
    fn test_arithmetic_rejects_irregular() {
        assert!(arithmetic(&[1.0, 7.0, 3.0, 12.0, 9.0]).is_none());
    }

    #[test]
    fn test_arithmetic_short() {
        assert!(arithmetic(&[1.0]).is_none());
        let m = arithmetic(&[1.0, 3.0]).unwrap();
        assert_eq!(m.predicted_next, 5.0);
        // two terms: sufficiency 0.5, single step quality 0.7
        assert!((m.confidence - 0.95 * 0.5 * 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic_description_base() {
        let m = ArithmeticDetector::new()
            .with_base_confidence(0.9)
            .detect(&[1.0, 2.0, 3.0, 4.0], &ToleranceConfig::default(), &TimeoutGuard::default())
            .unwrap()
            .unwrap();
        assert!((m.confidence - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic_confidence_monotone_in_length() {
        let mut previous = 0.0;
        for n in 2..12 {
            let seq: Vec<f64> = (0..n).map(|i| 3.0 * i as f64 + 1.0).collect();
            let c = arithmetic(&seq).unwrap().confidence;
            assert!(c >= previous, "confidence dropped at length {}", n);
            previous = c;
        }
    }

    #[test]
    fn test_geometric_basic() {
        let m = geometric(&[2.0, 4.0, 8.0, 16.0, 32.0]).unwrap();
        assert_eq!(m.predicted_next, 64.0);
        assert!((m.confidence - 0.95 / 1.1).abs() < 1e-12);
        assert_eq!(m.pattern_type(), "geometric");
    }

    #[test]
    fn test_geometric_fractional_ratio() {
        let m = geometric(&[81.0, 27.0, 9.0, 3.0]).unwrap();
        assert!((m.predicted_next - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_geometric_rejects_zeros() {
        assert!(geometric(&[0.0, 0.0, 0.0, 0.0]).is_none());
        assert!(geometric(&[1.0, 0.0, 2.0, 4.0]).is_none());
    }

    #[test]
    fn test_geometric_rejects_arithmetic() {
        assert!(geometric(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_none());
    }

    #[test]
    fn test_geometric_ratio_clamped() {
        let m = geometric(&[1e-9, 1.0]).unwrap();
        assert_eq!(m.kind, PatternKind::Geometric { common_ratio: GEOMETRIC_RATIO_LIMIT });
    }

    #[test]
    fn test_expired_guard_times_out() {
        let start = std::time::Instant::now()
            .checked_sub(std::time::Duration::from_secs(10))
            .unwrap();
        let guard = TimeoutGuard::with_start(start, std::time::Duration::from_secs(1));
        let err = ArithmeticDetector::new()
            .detect(&[1.0, 2.0, 3.0], &ToleranceConfig::default(), &guard)
            .unwrap_err();
        assert!(matches!(err, EngineError::Timeout(_)));
    }
}
