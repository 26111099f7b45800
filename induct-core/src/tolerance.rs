//! Closeness tolerances
//!
//! Comparison rule: `|a - b| <= atol + rtol * |b|`, where `b` is the reference.

use crate::ValidationError;
use serde::{Deserialize, Serialize};

/// Default relative tolerance (20% variance)
pub const RELATIVE_TOLERANCE_DEFAULT: f64 = 0.2;

/// Default absolute tolerance
pub const ABSOLUTE_TOLERANCE_DEFAULT: f64 = 1e-8;

/// Per-call tolerance for pattern acceptance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceConfig {
    pub relative_tolerance: f64,
    pub absolute_tolerance: f64,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            relative_tolerance: RELATIVE_TOLERANCE_DEFAULT,
            absolute_tolerance: ABSOLUTE_TOLERANCE_DEFAULT,
        }
    }
}

impl ToleranceConfig {
    /// Reconstruction check for recursive sequences
    pub const RECURSIVE: ToleranceConfig = ToleranceConfig::new(1e-5, 1e-10);

    /// Per-parity step check for alternating patterns
    pub const ALTERNATING: ToleranceConfig = ToleranceConfig::new(0.1, 1e-6);

    /// Tiling check for periodic patterns
    pub const PERIODIC: ToleranceConfig = ToleranceConfig::new(0.05, 1e-6);

    /// Classification of fitted polynomial coefficients
    pub const COEFFICIENT: ToleranceConfig = ToleranceConfig::new(1e-5, 1e-6);

    pub const fn new(relative_tolerance: f64, absolute_tolerance: f64) -> Self {
        Self { relative_tolerance, absolute_tolerance }
    }

    pub fn with_relative(mut self, relative_tolerance: f64) -> Self {
        self.relative_tolerance = relative_tolerance;
        self
    }

    pub fn with_absolute(mut self, absolute_tolerance: f64) -> Self {
        self.absolute_tolerance = absolute_tolerance;
        self
    }

    /// Reject negative or non-finite tolerances
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("relative_tolerance", self.relative_tolerance),
            ("absolute_tolerance", self.absolute_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidTolerance { name, value });
            }
        }
        Ok(())
    }

    pub fn is_close(&self, value: f64, reference: f64) -> bool {
        (value - reference).abs()
            <= self.absolute_tolerance + self.relative_tolerance * reference.abs()
    }

    /// Every value close to a single reference
    pub fn all_close_to(&self, values: &[f64], reference: f64) -> bool {
        values.iter().all(|&v| self.is_close(v, reference))
    }

    /// Element-wise closeness of two equally long slices
    pub fn all_close(&self, values: &[f64], references: &[f64]) -> bool {
        values.len() == references.len()
            && values
                .iter()
                .zip(references)
                .all(|(&v, &r)| self.is_close(v, r))
    }
}
