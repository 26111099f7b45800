//! Sequence engine
//!
//! Validates input, starts the call's time budget and walks an ordered
//! detector chain. Each top-level call reports its outcome to the optional
//! step sink exactly once.

use crate::confidence::BASE_CONFIDENCE_PATTERN_DESCRIPTION;
use crate::exponential::ExponentialDetector;
use crate::periodic::PeriodicDetector;
use crate::polynomial::PolynomialDetector;
use crate::progression::{ArithmeticDetector, GeometricDetector, GEOMETRIC_RATIO_LIMIT};
use crate::recursive::{FibonacciDetector, LucasDetector, TribonacciDetector};
use induct_core::{
    format_value, EngineConfig, EngineError, InputGuard, PatternKind, PatternMatch, TimeoutGuard, ToleranceConfig,
};
use induct_plugin::{DetectorChain, ReasoningStep, StepSink};
use serde_json::Value as JsonValue;
use tracing::debug;

pub const STAGE_PREDICTION: &str = "Inductive Reasoning: Sequence Prediction";
pub const STAGE_DESCRIPTION: &str = "Inductive Reasoning: Pattern Description";
pub const STAGE_RECURSIVE: &str = "Inductive Reasoning: Recursive Pattern Detection";
pub const STAGE_EXTENDED: &str = "Inductive Reasoning: Extended Pattern Detection";

pub const TOO_SHORT_MESSAGE: &str = "Sequence too short to determine a pattern.";
pub const NO_PATTERN_MESSAGE: &str = "No simple pattern found.";

/// Shortest sequence the recursive path will look at
pub const MIN_EXTENDED_LENGTH: usize = 5;

const PROGRESSION_ASSUMPTION: &str = "Sequence follows a simple arithmetic or geometric progression.";

/// Pattern-detection engine
///
/// Holds only immutable configuration and detector chains, so one engine
/// can serve many threads.
#[derive(Debug, Clone)]
pub struct SequenceEngine {
    config: EngineConfig,
    progression: DetectorChain,
    description: DetectorChain,
    recursive: DetectorChain,
    extended: DetectorChain,
}

impl Default for SequenceEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SequenceEngine {
    pub fn new(config: EngineConfig) -> Self {
        let progression = DetectorChain::new()
            .with_detector(ArithmeticDetector::new())
            .with_detector(GeometricDetector::new());

        let description = DetectorChain::new()
            .with_detector(ArithmeticDetector::new().with_base_confidence(BASE_CONFIDENCE_PATTERN_DESCRIPTION))
            .with_detector(GeometricDetector::new().with_base_confidence(BASE_CONFIDENCE_PATTERN_DESCRIPTION));

        let recursive = DetectorChain::new()
            .with_detector(FibonacciDetector)
            .with_detector(LucasDetector)
            .with_detector(TribonacciDetector);

        let extended = recursive
            .clone()
            .with_detector(PolynomialDetector::new(config.max_polynomial_degree))
            .with_detector(ExponentialDetector)
            .with_detector(PeriodicDetector);

        Self { config, progression, description, recursive, extended }
    }

    /// Engine configured from `INDUCT_*` environment variables
    pub fn from_env() -> Self {
        Self::new(EngineConfig::from_env())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Detectors consulted by [`SequenceEngine::detect_extended_pattern`], in order
    pub fn extended_chain(&self) -> &DetectorChain {
        &self.extended
    }

    /// Validate everything up front and start the call's budget
    fn begin(&self, sequence: &[f64], tolerance: &ToleranceConfig) -> Result<TimeoutGuard, EngineError> {
        InputGuard::validate_non_empty(sequence)?;
        tolerance.validate()?;
        InputGuard::validate(sequence)?;
        Ok(TimeoutGuard::new(self.config.timeout).with_interval(self.config.checkpoint_interval))
    }

    /// Next term and confidence from arithmetic or geometric progressions
    pub fn predict(
        &self,
        sequence: &[f64],
        tolerance: &ToleranceConfig,
        sink: Option<&mut dyn StepSink>,
    ) -> Result<Option<PatternMatch>, EngineError> {
        let guard = self.begin(sequence, tolerance)?;
        debug!(length = sequence.len(), "predicting next term");

        if sequence.len() < 2 {
            let description = format!("Sequence {:?} too short to determine a pattern.", sequence);
            record(sink, ReasoningStep::new(STAGE_PREDICTION, description));
            return Ok(None);
        }

        let found = self.progression.first_match(sequence, tolerance, &guard)?;
        match &found {
            Some(m) => {
                let description = format!(
                    "Identified {}. Predicted next: {}",
                    lowercase_first(&m.description),
                    format_value(m.predicted_next)
                );
                let step = ReasoningStep::new(STAGE_PREDICTION, description)
                .with_result(m.to_json())
                .with_confidence(m.confidence)
                .with_evidence(progression_evidence(sequence, m))
                .with_assumption(PROGRESSION_ASSUMPTION);
                record(sink, step);
            }
            None => {
                let description =
                    format!("No simple arithmetic or geometric pattern found for sequence: {:?}", sequence);
                record(sink, ReasoningStep::new(STAGE_PREDICTION, description));
            }
        }
        Ok(found)
    }

    /// Next term only
    pub fn predict_next(
        &self,
        sequence: &[f64],
        tolerance: &ToleranceConfig,
        sink: Option<&mut dyn StepSink>,
    ) -> Result<Option<f64>, EngineError> {
        Ok(self.predict(sequence, tolerance, sink)?.map(|m| m.predicted_next))
    }

    /// Human-readable description of an arithmetic or geometric progression
    pub fn describe_pattern(
        &self,
        sequence: &[f64],
        tolerance: &ToleranceConfig,
        sink: Option<&mut dyn StepSink>,
    ) -> Result<String, EngineError> {
        let guard = self.begin(sequence, tolerance)?;
        let attempt = format!("Attempting to describe pattern in sequence: {:?}", sequence);

        if sequence.len() < 2 {
            let step = ReasoningStep::new(STAGE_DESCRIPTION, attempt)
                .with_result(JsonValue::String(TOO_SHORT_MESSAGE.to_string()));
            record(sink, step);
            return Ok(TOO_SHORT_MESSAGE.to_string());
        }

        let found = self.description.first_match(sequence, tolerance, &guard)?;
        let (text, step) = match found {
            Some(m) => {
                let step = ReasoningStep::new(STAGE_DESCRIPTION, attempt)
                    .with_result(JsonValue::String(m.description.clone()))
                    .with_confidence(m.confidence)
                    .with_evidence(progression_evidence(sequence, &m))
                    .with_assumption(PROGRESSION_ASSUMPTION);
                (m.description, step)
            }
            None => {
                let step = ReasoningStep::new(STAGE_DESCRIPTION, attempt)
                    .with_result(JsonValue::String(NO_PATTERN_MESSAGE.to_string()));
                (NO_PATTERN_MESSAGE.to_string(), step)
            }
        };
        record(sink, step);
        Ok(text)
    }

    /// Fibonacci, Lucas or Tribonacci recurrences only
    pub fn detect_recursive_pattern(
        &self,
        sequence: &[f64],
        tolerance: &ToleranceConfig,
        sink: Option<&mut dyn StepSink>,
    ) -> Result<Option<PatternMatch>, EngineError> {
        let guard = self.begin(sequence, tolerance)?;
        if sequence.len() < MIN_EXTENDED_LENGTH {
            let description = format!("Sequence {:?} too short for recursive pattern detection", sequence);
            record(sink, ReasoningStep::new(STAGE_RECURSIVE, description));
            return Ok(None);
        }

        let found = self.recursive.first_match(sequence, tolerance, &guard)?;
        record(sink, detection_step(STAGE_RECURSIVE, "recursive", sequence, found.as_ref()));
        Ok(found)
    }

    /// Recursive, polynomial, exponential and periodic families, in that order
    pub fn detect_extended_pattern(
        &self,
        sequence: &[f64],
        tolerance: &ToleranceConfig,
        sink: Option<&mut dyn StepSink>,
    ) -> Result<Option<PatternMatch>, EngineError> {
        let guard = self.begin(sequence, tolerance)?;
        debug!(length = sequence.len(), "extended pattern detection");

        let found = self.extended.first_match(sequence, tolerance, &guard)?;
        record(sink, detection_step(STAGE_EXTENDED, "extended", sequence, found.as_ref()));
        Ok(found)
    }
}

fn record(sink: Option<&mut dyn StepSink>, step: ReasoningStep) {
    if let Some(sink) = sink {
        sink.record_step(step);
    }
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn progression_evidence(sequence: &[f64], m: &PatternMatch) -> String {
    match m.kind {
        PatternKind::Arithmetic { common_difference } => {
            let diffs: Vec<f64> = sequence.windows(2).map(|w| w[1] - w[0]).collect();
            format!(
                "Common difference {} found in {:?}. Confidence based on pattern quality and data sufficiency.",
                format_value(common_difference),
                diffs
            )
        }
        PatternKind::Geometric { common_ratio } => {
            let ratios: Vec<f64> = sequence
                .windows(2)
                .map(|w| (w[1] / w[0]).clamp(-GEOMETRIC_RATIO_LIMIT, GEOMETRIC_RATIO_LIMIT))
                .collect();
            format!(
                "Common ratio {} found in {:?}. Confidence based on pattern quality and data sufficiency.",
                format_value(common_ratio),
                ratios
            )
        }
        _ => format!("Next term: {}", format_value(m.predicted_next)),
    }
}

fn detection_step(stage: &str, scope: &str, sequence: &[f64], found: Option<&PatternMatch>) -> ReasoningStep {
    match found {
        Some(m) => {
            let pattern = m.pattern_type();
            let evidence = match &m.kind {
                PatternKind::Recursive { rule, .. } => {
                    format!("Pattern rule: {}. Next term: {}", rule, format_value(m.predicted_next))
                }
                _ => format!("{}. Next term: {}", m.description, format_value(m.predicted_next)),
            };
            ReasoningStep::new(stage, format!("Detected {} pattern: {}", pattern, m.description))
                .with_result(m.to_json())
                .with_confidence(m.confidence)
                .with_evidence(evidence)
                .with_assumption(format!("Sequence follows a {} pattern", pattern))
        }
        None => ReasoningStep::new(stage, format!("No {} pattern found in sequence: {:?}", scope, sequence)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use induct_core::{RecursiveKind, ValidationError, MAX_SEQUENCE_LENGTH};
    use induct_plugin::ReasoningTrace;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn tol() -> ToleranceConfig {
        ToleranceConfig::default()
    }

    #[test]
    fn test_predict_arithmetic() {
        init_tracing();
        let engine = SequenceEngine::default();
        let m = engine.predict(&[1.0, 2.0, 3.0, 4.0, 5.0], &tol(), None).unwrap().unwrap();
        assert_eq!(m.predicted_next, 6.0);
        assert!(m.confidence > 0.9);
    }

    #[test]
    fn test_predict_geometric_confidence() {
        let engine = SequenceEngine::default();
        let m = engine.predict(&[2.0, 4.0, 8.0, 16.0, 32.0], &tol(), None).unwrap().unwrap();
        assert_eq!(m.predicted_next, 64.0);
        assert!((m.confidence - 0.95 / 1.1).abs() < 1e-12);
        assert!((m.confidence - 0.8636).abs() < 1e-4);
    }

    #[test]
    fn test_predict_no_pattern() {
        let engine = SequenceEngine::default();
        assert_eq!(engine.predict_next(&[1.0, 7.0, 3.0, 12.0, 9.0], &tol(), None).unwrap(), None);
    }

    #[test]
    fn test_predict_zeros_is_arithmetic() {
        let engine = SequenceEngine::default();
        let m = engine.predict(&[0.0, 0.0, 0.0, 0.0], &tol(), None).unwrap().unwrap();
        assert_eq!(m.pattern_type(), "arithmetic");
        assert_eq!(m.predicted_next, 0.0);
        assert!(m.confidence > 0.9);
    }

    #[test]
    fn test_single_element() {
        let engine = SequenceEngine::default();
        let mut trace = ReasoningTrace::new();
        assert_eq!(engine.predict_next(&[4.0], &tol(), Some(&mut trace)).unwrap(), None);
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.steps[0].confidence, 0.0);
        assert_eq!(engine.describe_pattern(&[4.0], &tol(), None).unwrap(), TOO_SHORT_MESSAGE);
    }

    #[test]
    fn test_empty_rejected() {
        let engine = SequenceEngine::default();
        let err = engine.predict_next(&[], &tol(), None).unwrap_err();
        assert!(matches!(err, EngineError::Validation(ValidationError::Empty)));
    }

    #[test]
    fn test_too_large_rejected() {
        let engine = SequenceEngine::default();
        let seq = vec![1.0; MAX_SEQUENCE_LENGTH + 1];
        let err = engine.predict_next(&seq, &tol(), None).unwrap_err();
        assert!(matches!(err, EngineError::Validation(ValidationError::TooLarge { length: 10_001, max: 10_000 })));
    }

    #[test]
    fn test_non_finite_rejected_before_detection() {
        let engine = SequenceEngine::default();
        let mut trace = ReasoningTrace::new();
        let err = engine
            .detect_extended_pattern(&[1.0, 1.0, f64::NAN, 3.0, 5.0], &tol(), Some(&mut trace))
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(ValidationError::NonFinite { index: 2, .. })));
        assert!(trace.is_empty());
    }

    #[test]
    fn test_invalid_tolerance_rejected() {
        let engine = SequenceEngine::default();
        let bad = ToleranceConfig::default().with_relative(-1.0);
        let err = engine.describe_pattern(&[1.0, 2.0], &bad, None).unwrap_err();
        assert!(matches!(err, EngineError::Validation(ValidationError::InvalidTolerance { .. })));
    }

    #[test]
    fn test_describe_pattern() {
        let engine = SequenceEngine::default();
        assert_eq!(
            engine.describe_pattern(&[1.0, 2.0, 3.0, 4.0], &tol(), None).unwrap(),
            "Arithmetic progression with common difference: 1"
        );
        assert_eq!(
            engine.describe_pattern(&[3.0, 6.0, 12.0, 24.0], &tol(), None).unwrap(),
            "Geometric progression with common ratio: 2"
        );
        assert_eq!(engine.describe_pattern(&[1.0, 7.0, 3.0, 12.0, 9.0], &tol(), None).unwrap(), NO_PATTERN_MESSAGE);
    }

    #[test]
    fn test_describe_uses_description_base() {
        let engine = SequenceEngine::default();
        let mut trace = ReasoningTrace::new();
        engine.describe_pattern(&[1.0, 2.0, 3.0, 4.0], &tol(), Some(&mut trace)).unwrap();
        let step = trace.last().unwrap();
        assert_eq!(step.stage, STAGE_DESCRIPTION);
        assert!((step.confidence - 0.9).abs() < 1e-12);
        assert_eq!(step.assumptions, vec![PROGRESSION_ASSUMPTION.to_string()]);
    }

    #[test]
    fn test_prediction_step_recorded_once() {
        let engine = SequenceEngine::default();
        let mut steps: Vec<ReasoningStep> = Vec::new();
        engine.predict_next(&[2.0, 4.0, 8.0, 16.0], &tol(), Some(&mut steps)).unwrap();
        assert_eq!(steps.len(), 1);
        let step = &steps[0];
        assert_eq!(step.stage, STAGE_PREDICTION);
        let result = step.result.as_ref().unwrap();
        assert_eq!(result["type"], "geometric");
        assert_eq!(result["predicted_next"], 32.0);
        assert!(step.evidence.as_deref().unwrap().starts_with("Common ratio 2 found in"));
        assert_eq!(step.description, "Identified geometric progression with common ratio: 2. Predicted next: 32");
    }

    #[test]
    fn test_geometric_evidence_ratios_clamped() {
        let engine = SequenceEngine::default();
        let mut steps: Vec<ReasoningStep> = Vec::new();
        let m = engine.predict(&[1e-9, 1.0, 1e9], &tol(), Some(&mut steps)).unwrap().unwrap();
        assert_eq!(m.pattern_type(), "geometric");
        let evidence = steps[0].evidence.as_deref().unwrap();
        assert!(evidence.contains("1000000"));
        assert!(!evidence.contains("1000000000"));
    }

    #[test]
    fn test_extended_fibonacci() {
        init_tracing();
        let engine = SequenceEngine::default();
        let m = engine
            .detect_extended_pattern(&[1.0, 1.0, 2.0, 3.0, 5.0, 8.0], &tol(), None)
            .unwrap()
            .unwrap();
        assert_eq!(m.pattern_type(), "fibonacci");
        assert_eq!(m.predicted_next, 13.0);
    }

    #[test]
    fn test_extended_classic_lucas() {
        let engine = SequenceEngine::default();
        let classic = engine
            .detect_extended_pattern(&[2.0, 1.0, 3.0, 4.0, 7.0], &tol(), None)
            .unwrap()
            .unwrap();
        assert_eq!(classic.pattern_type(), "lucas");
        assert_eq!(classic.predicted_next, 11.0);

        let variant = engine
            .extended_chain()
            .get_detector("lucas")
            .unwrap()
            .detect(&[3.0, 1.0, 4.0, 5.0, 9.0], &tol(), &TimeoutGuard::default())
            .unwrap()
            .unwrap();
        assert!(matches!(variant.kind, PatternKind::Recursive { kind: RecursiveKind::LucasVariant, .. }));
        assert!(classic.confidence > variant.confidence);
    }

    #[test]
    fn test_extended_four_term_exponential() {
        let engine = SequenceEngine::default();
        let m = engine
            .detect_extended_pattern(&[3.0, 6.0, 12.0, 24.0], &tol(), None)
            .unwrap()
            .unwrap();
        assert_eq!(m.pattern_type(), "exponential");
        assert!((m.predicted_next - 48.0).abs() < 1e-9);
    }

    #[test]
    fn test_extended_too_short() {
        let engine = SequenceEngine::default();
        let mut trace = ReasoningTrace::new();
        assert!(engine
            .detect_extended_pattern(&[1.0, 7.0, 3.0], &tol(), Some(&mut trace))
            .unwrap()
            .is_none());
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.steps[0].stage, STAGE_EXTENDED);
    }

    #[test]
    fn test_extended_squares() {
        let engine = SequenceEngine::default();
        let m = engine
            .detect_extended_pattern(&[1.0, 4.0, 9.0, 16.0, 25.0], &tol(), None)
            .unwrap()
            .unwrap();
        assert_eq!(m.pattern_type(), "perfect_squares");
    }

    #[test]
    fn test_extended_periodic() {
        let engine = SequenceEngine::default();
        let m = engine
            .detect_extended_pattern(&[1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0], &tol(), None)
            .unwrap()
            .unwrap();
        assert_eq!(m.pattern_type(), "periodic");
        assert_eq!(m.predicted_next, -1.0);
    }

    #[test]
    fn test_extended_overflow_falls_through() {
        let engine = SequenceEngine::default();
        let seq = [9e14, 9e14, 9e14, 9e14, 9e14, 9e14];
        let m = engine.detect_extended_pattern(&seq, &tol(), None).unwrap();
        // constant sequence: overflow in the recurrences, no polynomial fit,
        // exact exponential with base 1
        assert_eq!(m.unwrap().pattern_type(), "exponential");
    }

    #[test]
    fn test_extended_step_carries_rule() {
        let engine = SequenceEngine::default();
        let mut trace = ReasoningTrace::new();
        engine
            .detect_extended_pattern(&[0.0, 0.0, 1.0, 1.0, 2.0, 4.0, 7.0], &tol(), Some(&mut trace))
            .unwrap();
        let step = trace.last().unwrap();
        assert_eq!(step.stage, STAGE_EXTENDED);
        assert_eq!(step.evidence.as_deref(), Some("Pattern rule: T[n] = T[n-1] + T[n-2] + T[n-3]. Next term: 13"));
        assert_eq!(step.result.as_ref().unwrap()["type"], "tribonacci");
    }

    #[test]
    fn test_recursive_only() {
        let engine = SequenceEngine::default();
        let mut trace = ReasoningTrace::new();
        let none = engine
            .detect_recursive_pattern(&[1.0, 4.0, 9.0, 16.0, 25.0], &tol(), Some(&mut trace))
            .unwrap();
        assert!(none.is_none());
        assert_eq!(trace.last().unwrap().stage, STAGE_RECURSIVE);
        assert_eq!(trace.last().unwrap().confidence, 0.0);
    }

    #[test]
    fn test_determinism() {
        let engine = SequenceEngine::default();
        let seq = [1.5, 3.1, 4.4, 6.2, 7.4, 9.1];
        let a = engine.predict(&seq, &tol(), None).unwrap();
        let b = engine.predict(&seq, &tol(), None).unwrap();
        assert_eq!(a, b);
        let a = engine.detect_extended_pattern(&seq, &tol(), None).unwrap();
        let b = engine.detect_extended_pattern(&seq, &tol(), None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SequenceEngine>();
    }
}
