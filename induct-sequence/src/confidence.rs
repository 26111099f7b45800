//! Confidence scoring
//!
//! `confidence = clamp(base × data_sufficiency × pattern_quality × complexity, 0, 1)`
//!
//! - data sufficiency: have we seen enough terms to trust the family?
//! - pattern quality: how regular are the steps (differences or ratios)?
//! - complexity: structurally richer families are penalised.
//!
//! Every function here is pure; the same inputs give bit-identical outputs.

use crate::helpers::{mean, mean_abs, safe_ratio, std_dev, NUMERICAL_STABILITY_THRESHOLD};
use serde::Serialize;

pub const BASE_CONFIDENCE_ARITHMETIC: f64 = 0.95;
pub const BASE_CONFIDENCE_GEOMETRIC: f64 = 0.95;
pub const BASE_CONFIDENCE_PATTERN_DESCRIPTION: f64 = 0.9;
pub const BASE_CONFIDENCE_FIBONACCI: f64 = 0.9;
pub const BASE_CONFIDENCE_LUCAS: f64 = 0.95;
pub const BASE_CONFIDENCE_LUCAS_VARIANT: f64 = 0.85;
pub const BASE_CONFIDENCE_TRIBONACCI: f64 = 0.8;
pub const BASE_CONFIDENCE_POLYNOMIAL: f64 = 0.85;

pub const COMPLEXITY_SCORE_ARITHMETIC: f64 = 0.0;
pub const COMPLEXITY_SCORE_GEOMETRIC: f64 = 0.1;
pub const COMPLEXITY_SCORE_RECURSIVE: f64 = 0.3;
pub const COMPLEXITY_SCORE_TRIBONACCI: f64 = 0.2;
pub const COMPLEXITY_SCORE_POLYNOMIAL_DEGREE_FACTOR: f64 = 0.1;

pub const DATA_SUFFICIENCY_MINIMUM_ARITHMETIC: usize = 4;
pub const DATA_SUFFICIENCY_MINIMUM_GEOMETRIC: usize = 4;
pub const DATA_SUFFICIENCY_MINIMUM_RECURSIVE: usize = 5;
pub const DATA_SUFFICIENCY_MINIMUM_TRIBONACCI: usize = 6;
pub const DATA_SUFFICIENCY_POLYNOMIAL_MARGIN: usize = 3;
pub const DATA_SUFFICIENCY_MINIMUM_DEFAULT: usize = 3;

pub const PATTERN_QUALITY_MINIMAL_DATA: f64 = 0.7;
pub const PATTERN_QUALITY_FLOOR: f64 = 0.1;
pub const PATTERN_QUALITY_DEFAULT_UNKNOWN: f64 = 0.5;
pub const COEFFICIENT_OF_VARIATION_DECAY_FACTOR: f64 = 2.0;

/// Exponential matches never score above this
pub const EXPONENTIAL_CONFIDENCE_CAP: f64 = 0.9;

pub const CONFIDENCE_MIN: f64 = 0.0;
pub const CONFIDENCE_MAX: f64 = 1.0;

/// Pattern family being scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternFamily {
    Arithmetic,
    Geometric,
    Fibonacci,
    Lucas,
    Tribonacci,
    Polynomial { degree: usize },
    Exponential,
    Periodic,
}

impl PatternFamily {
    /// Terms needed before the data fully supports the family
    pub fn minimum_required(&self) -> usize {
        match self {
            PatternFamily::Arithmetic => DATA_SUFFICIENCY_MINIMUM_ARITHMETIC,
            PatternFamily::Geometric => DATA_SUFFICIENCY_MINIMUM_GEOMETRIC,
            PatternFamily::Fibonacci | PatternFamily::Lucas => DATA_SUFFICIENCY_MINIMUM_RECURSIVE,
            PatternFamily::Tribonacci => DATA_SUFFICIENCY_MINIMUM_TRIBONACCI,
            PatternFamily::Polynomial { degree } => degree + DATA_SUFFICIENCY_POLYNOMIAL_MARGIN,
            PatternFamily::Exponential | PatternFamily::Periodic => DATA_SUFFICIENCY_MINIMUM_DEFAULT,
        }
    }

    /// Fixed structural complexity of the family
    pub fn complexity_score(&self) -> f64 {
        match self {
            PatternFamily::Arithmetic => COMPLEXITY_SCORE_ARITHMETIC,
            PatternFamily::Geometric => COMPLEXITY_SCORE_GEOMETRIC,
            PatternFamily::Fibonacci | PatternFamily::Lucas => COMPLEXITY_SCORE_RECURSIVE,
            PatternFamily::Tribonacci => COMPLEXITY_SCORE_TRIBONACCI,
            PatternFamily::Polynomial { degree } => COMPLEXITY_SCORE_POLYNOMIAL_DEGREE_FACTOR * *degree as f64,
            PatternFamily::Exponential | PatternFamily::Periodic => 0.0,
        }
    }
}

/// `min(1, length / minimum_required)`
pub fn data_sufficiency(length: usize, family: PatternFamily) -> f64 {
    let minimum = family.minimum_required().max(1);
    (length as f64 / minimum as f64).min(1.0)
}

/// Regularity of the step values, in [0.1, 1.0].
///
/// `values` are the differences (arithmetic) or ratios (geometric).
pub fn pattern_quality(values: &[f64], family: PatternFamily) -> f64 {
    if values.len() <= 1 {
        return PATTERN_QUALITY_MINIMAL_DATA;
    }

    match family {
        PatternFamily::Arithmetic => {
            let m = mean_abs(values);
            if m < NUMERICAL_STABILITY_THRESHOLD {
                // constant sequence
                return 1.0;
            }
            let cv = safe_ratio(std_dev(values), m, NUMERICAL_STABILITY_THRESHOLD);
            (-COEFFICIENT_OF_VARIATION_DECAY_FACTOR * cv).exp().max(PATTERN_QUALITY_FLOOR)
        }
        PatternFamily::Geometric => {
            let m = mean(values);
            if m.abs() < NUMERICAL_STABILITY_THRESHOLD {
                return PATTERN_QUALITY_FLOOR;
            }
            let cv = safe_ratio(std_dev(values), m.abs(), NUMERICAL_STABILITY_THRESHOLD);
            (-COEFFICIENT_OF_VARIATION_DECAY_FACTOR * cv).exp().max(PATTERN_QUALITY_FLOOR)
        }
        _ => PATTERN_QUALITY_DEFAULT_UNKNOWN,
    }
}

/// `1 / (1 + score)`
pub fn complexity_factor(score: f64) -> f64 {
    1.0 / (1.0 + score)
}

pub fn compose(base_confidence: f64, sufficiency: f64, quality: f64, complexity: f64) -> f64 {
    (base_confidence * sufficiency * quality * complexity).clamp(CONFIDENCE_MIN, CONFIDENCE_MAX)
}

/// Confidence for a step-based family (arithmetic or geometric)
pub fn progression_confidence(steps: &[f64], length: usize, family: PatternFamily, base_confidence: f64) -> f64 {
    compose(
        base_confidence,
        data_sufficiency(length, family),
        pattern_quality(steps, family),
        complexity_factor(family.complexity_score()),
    )
}

/// Confidence for a recursive family given how well the reconstruction matched
pub fn recursive_confidence(length: usize, match_score: f64, family: PatternFamily, base_confidence: f64) -> f64 {
    compose(
        base_confidence,
        data_sufficiency(length, family),
        match_score,
        complexity_factor(family.complexity_score()),
    )
}

/// Confidence for a polynomial fit of the given degree
pub fn polynomial_confidence(length: usize, r_squared: f64, degree: usize) -> f64 {
    let family = PatternFamily::Polynomial { degree };
    compose(
        BASE_CONFIDENCE_POLYNOMIAL,
        data_sufficiency(length, family),
        r_squared,
        complexity_factor(family.complexity_score()),
    )
}

/// Confidence for an exponential fit, capped at 0.9
pub fn exponential_confidence(match_score: f64) -> f64 {
    (match_score * EXPONENTIAL_CONFIDENCE_CAP)
        .min(EXPONENTIAL_CONFIDENCE_CAP)
        .max(CONFIDENCE_MIN)
}
