//! Linear recurrences: Fibonacci, Lucas, Tribonacci
//!
//! Each detector seeds a reconstruction with the first terms of the input,
//! regenerates the rest with the recurrence and compares it to the data.

use crate::confidence::{
    recursive_confidence, PatternFamily, BASE_CONFIDENCE_FIBONACCI, BASE_CONFIDENCE_LUCAS,
    BASE_CONFIDENCE_LUCAS_VARIANT, BASE_CONFIDENCE_TRIBONACCI,
};
use crate::helpers::{mean_abs, mean_abs_error, safe_ratio, NUMERICAL_STABILITY_THRESHOLD};
use induct_core::{
    ComputationError, EngineError, PatternKind, PatternMatch, RecursiveKind, TimeoutGuard, ToleranceConfig,
    VALUE_MAGNITUDE_LIMIT,
};
use induct_plugin::{DetectorMeta, PatternDetector};

pub const FIBONACCI_RULE: &str = "F[n] = F[n-1] + F[n-2]";
pub const LUCAS_RULE: &str = "L[n] = L[n-1] + L[n-2]";
pub const TRIBONACCI_RULE: &str = "T[n] = T[n-1] + T[n-2] + T[n-3]";

/// Seeds of the classic Lucas numbers
pub const LUCAS_SEEDS: [f64; 2] = [2.0, 1.0];

/// Regenerate `sequence` from its first `order` terms.
///
/// Fails with `Overflow` when an operand exceeds the magnitude limit.
fn reconstruct(
    sequence: &[f64],
    order: usize,
    detector: &'static str,
    guard: &TimeoutGuard,
) -> Result<Vec<f64>, EngineError> {
    let mut out = Vec::with_capacity(sequence.len());
    out.extend_from_slice(&sequence[..order]);

    for i in order..sequence.len() {
        guard.checkpoint_at(i)?;
        let operands = &out[i - order..i];
        if operands.iter().any(|x| x.abs() > VALUE_MAGNITUDE_LIMIT) {
            return Err(ComputationError::Overflow { detector, position: i }.into());
        }
        out.push(operands.iter().sum());
    }

    guard.checkpoint()?;
    Ok(out)
}

/// How closely the reconstruction follows the data, in [0, 1]
fn match_score(actual: &[f64], reconstructed: &[f64]) -> f64 {
    let err = mean_abs_error(actual, reconstructed);
    (1.0 - safe_ratio(err, mean_abs(actual), NUMERICAL_STABILITY_THRESHOLD)).clamp(0.0, 1.0)
}

/// Reconstruction that passed the acceptance check
struct Fit {
    reconstructed: Vec<f64>,
    score: f64,
}

impl Fit {
    fn next(&self, order: usize) -> f64 {
        self.reconstructed[self.reconstructed.len() - order..].iter().sum()
    }
}

fn fit_recurrence(
    sequence: &[f64],
    order: usize,
    detector: &'static str,
    guard: &TimeoutGuard,
) -> Result<Option<Fit>, EngineError> {
    let reconstructed = reconstruct(sequence, order, detector, guard)?;
    if !ToleranceConfig::RECURSIVE.all_close(sequence, &reconstructed) {
        return Ok(None);
    }
    let score = match_score(sequence, &reconstructed);
    Ok(Some(Fit { reconstructed, score }))
}

fn is_classic_lucas(sequence: &[f64]) -> bool {
    ToleranceConfig::RECURSIVE.all_close(&sequence[..2], &LUCAS_SEEDS)
}

fn recursive_match(
    kind: RecursiveKind,
    rule: &str,
    sequence: &[f64],
    fit: &Fit,
    confidence: f64,
) -> PatternMatch {
    let order = kind.order();
    let seeds = sequence[..order].to_vec();
    let description = format!("{} sequence ({})", title(kind), rule);
    PatternMatch::new(
        PatternKind::Recursive { kind, rule: rule.to_string(), seed_values: seeds },
        fit.next(order),
        confidence,
        description,
    )
}

fn title(kind: RecursiveKind) -> &'static str {
    match kind {
        RecursiveKind::Fibonacci => "Fibonacci",
        RecursiveKind::Lucas => "Lucas",
        RecursiveKind::LucasVariant => "Lucas-like",
        RecursiveKind::Tribonacci => "Tribonacci",
    }
}

/// `F[n] = F[n-1] + F[n-2]` from arbitrary seeds.
///
/// Defers to [`LucasDetector`] when the seeds are the classic (2, 1).
#[derive(Debug, Clone, Copy, Default)]
pub struct FibonacciDetector;

impl PatternDetector for FibonacciDetector {
    fn meta(&self) -> DetectorMeta {
        DetectorMeta {
            name: "fibonacci",
            description: "Each term is the sum of the previous two",
            min_length: 5,
            detects: &["fibonacci"],
        }
    }

    fn detect(
        &self,
        sequence: &[f64],
        _tolerance: &ToleranceConfig,
        guard: &TimeoutGuard,
    ) -> Result<Option<PatternMatch>, EngineError> {
        if sequence.len() < self.meta().min_length || is_classic_lucas(sequence) {
            return Ok(None);
        }

        let Some(fit) = fit_recurrence(sequence, 2, "fibonacci", guard)? else {
            return Ok(None);
        };
        let confidence =
            recursive_confidence(sequence.len(), fit.score, PatternFamily::Fibonacci, BASE_CONFIDENCE_FIBONACCI);
        Ok(Some(recursive_match(RecursiveKind::Fibonacci, FIBONACCI_RULE, sequence, &fit, confidence)))
    }
}

/// Lucas recurrence; classic seeds (2, 1) score above other seeds
#[derive(Debug, Clone, Copy, Default)]
pub struct LucasDetector;

impl PatternDetector for LucasDetector {
    fn meta(&self) -> DetectorMeta {
        DetectorMeta {
            name: "lucas",
            description: "Fibonacci recurrence, classic seeds 2 and 1",
            min_length: 5,
            detects: &["lucas", "lucas_variant"],
        }
    }

    fn detect(
        &self,
        sequence: &[f64],
        _tolerance: &ToleranceConfig,
        guard: &TimeoutGuard,
    ) -> Result<Option<PatternMatch>, EngineError> {
        if sequence.len() < self.meta().min_length {
            return Ok(None);
        }

        let Some(fit) = fit_recurrence(sequence, 2, "lucas", guard)? else {
            return Ok(None);
        };
        let (kind, base) = if is_classic_lucas(sequence) {
            (RecursiveKind::Lucas, BASE_CONFIDENCE_LUCAS)
        } else {
            (RecursiveKind::LucasVariant, BASE_CONFIDENCE_LUCAS_VARIANT)
        };
        let confidence = recursive_confidence(sequence.len(), fit.score, PatternFamily::Lucas, base);
        Ok(Some(recursive_match(kind, LUCAS_RULE, sequence, &fit, confidence)))
    }
}

/// `T[n] = T[n-1] + T[n-2] + T[n-3]`
#[derive(Debug, Clone, Copy, Default)]
pub struct TribonacciDetector;

impl PatternDetector for TribonacciDetector {
    fn meta(&self) -> DetectorMeta {
        DetectorMeta {
            name: "tribonacci",
            description: "Each term is the sum of the previous three",
            min_length: 6,
            detects: &["tribonacci"],
        }
    }

    fn detect(
        &self,
        sequence: &[f64],
        _tolerance: &ToleranceConfig,
        guard: &TimeoutGuard,
    ) -> Result<Option<PatternMatch>, EngineError> {
        if sequence.len() < self.meta().min_length {
            return Ok(None);
        }

        let Some(fit) = fit_recurrence(sequence, 3, "tribonacci", guard)? else {
            return Ok(None);
        };
        let confidence =
            recursive_confidence(sequence.len(), fit.score, PatternFamily::Tribonacci, BASE_CONFIDENCE_TRIBONACCI);
        Ok(Some(recursive_match(RecursiveKind::Tribonacci, TRIBONACCI_RULE, sequence, &fit, confidence)))
    }
}
