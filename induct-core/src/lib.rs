//! Induct Core - Fundamental types
//!
//! This crate provides the core types used throughout Induct:
//! - `ToleranceConfig`: per-call closeness rules
//! - `InputGuard` / `TimeoutGuard`: denial-of-service guards
//! - `PatternMatch`: detected patterns with prediction and confidence
//! - `EngineError`: structured errors for LLM consumption
//! - `EngineConfig`: engine-wide settings

mod config;
mod error;
mod guard;
mod pattern;
mod tolerance;

pub use config::{EngineConfig, DEFAULT_MAX_POLYNOMIAL_DEGREE};
pub use error::{codes, ComputationError, EngineError, ErrorReport, Severity, TimeoutError, ValidationError};
pub use guard::{
    InputGuard, TimeoutGuard, CHECKPOINT_INTERVAL, COMPUTATION_TIMEOUT_SECONDS, MAX_SEQUENCE_LENGTH,
    VALUE_MAGNITUDE_LIMIT,
};
pub use pattern::{format_value, PatternKind, PatternMatch, PolynomialShape, RecursiveKind};
pub use tolerance::{ToleranceConfig, ABSOLUTE_TOLERANCE_DEFAULT, RELATIVE_TOLERANCE_DEFAULT};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        EngineConfig, EngineError, InputGuard, PatternKind, PatternMatch, PolynomialShape, RecursiveKind,
        TimeoutGuard, ToleranceConfig, ValidationError,
    };
    pub use crate::error::codes;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    mod error_tests {
        use super::*;

        #[test]
        fn test_error_codes() {
            let err: EngineError = ValidationError::Empty.into();
            assert_eq!(err.code(), codes::EMPTY_SEQUENCE);

            let err: EngineError = ComputationError::Overflow { detector: "Fibonacci", position: 7 }.into();
            assert_eq!(err.code(), codes::OVERFLOW);
            assert!(err.is_overflow());
            assert_eq!(err.severity(), Severity::Warning);
        }

        #[test]
        fn test_error_display() {
            let err: EngineError = ValidationError::TooLarge { length: 10_001, max: 10_000 }.into();
            let display = format!("{}", err);
            assert!(display.contains("10001"));
            assert!(display.contains("10000"));
        }

        #[test]
        fn test_timeout_display() {
            let err = TimeoutError {
                elapsed: Duration::from_millis(5250),
                budget: Duration::from_secs(5),
            };
            assert_eq!(
                err.to_string(),
                "Computation timeout after 5.25 seconds, maximum allowed is 5.00 seconds"
            );
        }

        #[test]
        fn test_report_has_suggestion() {
            let err: EngineError = ValidationError::NonFinite { index: 2, value: f64::NAN }.into();
            let report = err.report();
            assert_eq!(report.code, codes::NON_FINITE);
            assert!(report.suggestion.is_some());
            assert_eq!(report.severity, Severity::Error);
            assert!(format!("{}", report).starts_with("[NON_FINITE]"));
        }

        #[test]
        fn test_report_serializes() {
            let err: EngineError = ValidationError::Empty.into();
            let json = serde_json::to_value(err.report()).unwrap();
            assert_eq!(json["code"], "EMPTY_SEQUENCE");
            assert_eq!(json["severity"], "error");
        }
    }
}
