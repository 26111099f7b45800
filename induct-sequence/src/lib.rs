//! Induct Sequence
//!
//! Pattern detection over numeric sequences: arithmetic and geometric
//! progressions, linear recurrences, polynomial and exponential fits and
//! periodic structure, each with a calibrated confidence.
//!
//! The free functions below run a default [`SequenceEngine`] without a step
//! sink. Build an engine directly to change the configuration or to record
//! reasoning steps.

pub mod confidence;
mod engine;
pub mod exponential;
mod helpers;
pub mod periodic;
pub mod polynomial;
pub mod progression;
pub mod recursive;

pub use engine::{
    SequenceEngine, MIN_EXTENDED_LENGTH, NO_PATTERN_MESSAGE, STAGE_DESCRIPTION, STAGE_EXTENDED, STAGE_PREDICTION,
    STAGE_RECURSIVE, TOO_SHORT_MESSAGE,
};
pub use exponential::ExponentialDetector;
pub use helpers::safe_ratio;
pub use periodic::PeriodicDetector;
pub use polynomial::PolynomialDetector;
pub use progression::{ArithmeticDetector, GeometricDetector};
pub use recursive::{FibonacciDetector, LucasDetector, TribonacciDetector};

use induct_core::{EngineError, PatternMatch, ToleranceConfig};

/// Next term and confidence from arithmetic or geometric progressions
pub fn predict(sequence: &[f64], tolerance: &ToleranceConfig) -> Result<Option<PatternMatch>, EngineError> {
    SequenceEngine::default().predict(sequence, tolerance, None)
}

/// Next term of an arithmetic or geometric progression
pub fn predict_next(sequence: &[f64], tolerance: &ToleranceConfig) -> Result<Option<f64>, EngineError> {
    SequenceEngine::default().predict_next(sequence, tolerance, None)
}

pub fn describe_pattern(sequence: &[f64], tolerance: &ToleranceConfig) -> Result<String, EngineError> {
    SequenceEngine::default().describe_pattern(sequence, tolerance, None)
}

pub fn detect_recursive_pattern(
    sequence: &[f64],
    tolerance: &ToleranceConfig,
) -> Result<Option<PatternMatch>, EngineError> {
    SequenceEngine::default().detect_recursive_pattern(sequence, tolerance, None)
}

/// Recursive, polynomial, exponential and periodic detection
pub fn detect_extended_pattern(
    sequence: &[f64],
    tolerance: &ToleranceConfig,
) -> Result<Option<PatternMatch>, EngineError> {
    SequenceEngine::default().detect_extended_pattern(sequence, tolerance, None)
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        describe_pattern, detect_extended_pattern, detect_recursive_pattern, predict, predict_next, SequenceEngine,
    };
    pub use induct_plugin::prelude::*;
}
