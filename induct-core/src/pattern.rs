//! Detected patterns
//!
//! A `PatternMatch` is the call-scoped result of a successful detector: what
//! was found, the extrapolated next value, and how much to trust it.

use serde::{Deserialize, Serialize};

/// Which recurrence a recursive match follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecursiveKind {
    Fibonacci,
    /// Lucas recurrence seeded with the classic (2, 1)
    Lucas,
    /// Lucas recurrence with other seeds
    LucasVariant,
    Tribonacci,
}

impl RecursiveKind {
    pub fn tag(&self) -> &'static str {
        match self {
            RecursiveKind::Fibonacci => "fibonacci",
            RecursiveKind::Lucas => "lucas",
            RecursiveKind::LucasVariant => "lucas_variant",
            RecursiveKind::Tribonacci => "tribonacci",
        }
    }

    /// Number of previous terms the recurrence sums
    pub fn order(&self) -> usize {
        match self {
            RecursiveKind::Tribonacci => 3,
            _ => 2,
        }
    }
}

/// Recognised polynomial shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolynomialShape {
    /// n²
    PerfectSquares,
    /// n³
    PerfectCubes,
    General,
}

/// Family-specific parameters of a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum PatternKind {
    Arithmetic {
        common_difference: f64,
    },
    Geometric {
        common_ratio: f64,
    },
    Recursive {
        kind: RecursiveKind,
        rule: String,
        seed_values: Vec<f64>,
    },
    Polynomial {
        degree: usize,
        /// Highest power first
        coefficients: Vec<f64>,
        r_squared: f64,
        shape: PolynomialShape,
    },
    Exponential {
        base: f64,
        coefficient: f64,
        match_score: f64,
    },
    Periodic {
        period: usize,
        pattern: Vec<f64>,
    },
    AlternatingSteps {
        steps: [f64; 2],
    },
}

/// An accepted pattern with its prediction and confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    #[serde(flatten)]
    pub kind: PatternKind,
    pub predicted_next: f64,
    /// Always within [0, 1]
    pub confidence: f64,
    pub description: String,
}

impl PatternMatch {
    pub fn new(kind: PatternKind, predicted_next: f64, confidence: f64, description: impl Into<String>) -> Self {
        Self {
            kind,
            predicted_next,
            confidence: confidence.clamp(0.0, 1.0),
            description: description.into(),
        }
    }

    /// Wire tag of the pattern (`arithmetic`, `lucas_variant`, `perfect_squares`, ...)
    pub fn pattern_type(&self) -> String {
        match &self.kind {
            PatternKind::Arithmetic { .. } => "arithmetic".to_string(),
            PatternKind::Geometric { .. } => "geometric".to_string(),
            PatternKind::Recursive { kind, .. } => kind.tag().to_string(),
            PatternKind::Polynomial { degree, shape, .. } => match (shape, degree) {
                (PolynomialShape::PerfectSquares, _) => "perfect_squares".to_string(),
                (PolynomialShape::PerfectCubes, _) => "perfect_cubes".to_string(),
                (PolynomialShape::General, 2) => "quadratic".to_string(),
                (PolynomialShape::General, 3) => "cubic".to_string(),
                (PolynomialShape::General, d) => format!("polynomial_degree_{}", d),
            },
            PatternKind::Exponential { .. } => "exponential".to_string(),
            PatternKind::Periodic { .. } => "periodic".to_string(),
            PatternKind::AlternatingSteps { .. } => "alternating_steps".to_string(),
        }
    }

    /// JSON form handed to step sinks
    pub fn to_json(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        if let serde_json::Value::Object(ref mut map) = value {
            map.insert("type".to_string(), serde_json::Value::String(self.pattern_type()));
        }
        value
    }
}

/// Render a value the way people write it: integers without a fraction
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
