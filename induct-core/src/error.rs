//! Structured errors for LLM consumption
//!
//! Failing to find a pattern is never an error. Errors are reserved for
//! inputs the engine refuses to process, calls that run out of time, and
//! reconstructions that leave the safe numeric range.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const TOO_LARGE: &str = "TOO_LARGE";
    pub const NON_FINITE: &str = "NON_FINITE";
    pub const MAGNITUDE_EXCEEDED: &str = "MAGNITUDE_EXCEEDED";
    pub const EMPTY_SEQUENCE: &str = "EMPTY_SEQUENCE";
    pub const INVALID_TOLERANCE: &str = "INVALID_TOLERANCE";
    pub const TIMEOUT: &str = "TIMEOUT";
    pub const OVERFLOW: &str = "OVERFLOW";
}

/// Input rejected before any detector runs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Input sequence too large ({length} elements), maximum allowed is {max}")]
    TooLarge { length: usize, max: usize },

    #[error("Invalid value at position {index}: {value}, only finite numbers are allowed")]
    NonFinite { index: usize, value: f64 },

    #[error("Value magnitude too large at position {index}: {value}, maximum allowed magnitude is {limit}")]
    MagnitudeExceeded { index: usize, value: f64, limit: f64 },

    #[error("Sequence cannot be empty")]
    Empty,

    #[error("Tolerance '{name}' must be finite and non-negative, got {value}")]
    InvalidTolerance { name: &'static str, value: f64 },
}

/// Wall-clock budget exhausted at a checkpoint
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Computation timeout after {:.2} seconds, maximum allowed is {:.2} seconds", .elapsed.as_secs_f64(), .budget.as_secs_f64())]
pub struct TimeoutError {
    pub elapsed: Duration,
    pub budget: Duration,
}

/// Arithmetic left the safe range during a reconstruction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputationError {
    #[error("Value overflow detected at position {position} in {detector} calculation")]
    Overflow { detector: &'static str, position: usize },
}

/// Any error the engine can surface to a caller
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Timeout(#[from] TimeoutError),

    #[error(transparent)]
    Computation(#[from] ComputationError),
}

impl EngineError {
    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Validation(e) => match e {
                ValidationError::TooLarge { .. } => codes::TOO_LARGE,
                ValidationError::NonFinite { .. } => codes::NON_FINITE,
                ValidationError::MagnitudeExceeded { .. } => codes::MAGNITUDE_EXCEEDED,
                ValidationError::Empty => codes::EMPTY_SEQUENCE,
                ValidationError::InvalidTolerance { .. } => codes::INVALID_TOLERANCE,
            },
            EngineError::Timeout(_) => codes::TIMEOUT,
            EngineError::Computation(ComputationError::Overflow { .. }) => codes::OVERFLOW,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            EngineError::Computation(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, EngineError::Computation(ComputationError::Overflow { .. }))
    }

    /// Serializable report with a suggestion for the caller
    pub fn report(&self) -> ErrorReport {
        let suggestion = match self {
            EngineError::Validation(ValidationError::TooLarge { max, .. }) => {
                Some(format!("Submit at most {} elements", max))
            }
            EngineError::Validation(ValidationError::NonFinite { .. }) => {
                Some("Remove NaN and infinite values".to_string())
            }
            EngineError::Validation(ValidationError::MagnitudeExceeded { .. }) => {
                Some("Rescale the sequence before analysis".to_string())
            }
            EngineError::Validation(ValidationError::Empty) => {
                Some("Provide at least two values".to_string())
            }
            EngineError::Validation(ValidationError::InvalidTolerance { .. }) => {
                Some("Use finite, non-negative tolerances".to_string())
            }
            EngineError::Timeout(_) => Some("Submit a shorter sequence".to_string()),
            EngineError::Computation(_) => None,
        };
        ErrorReport {
            code: self.code().to_string(),
            message: self.to_string(),
            suggestion,
            severity: self.severity(),
        }
    }
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A single detector gave up, the call may still succeed
    Warning,
    /// The call failed
    Error,
}

/// Structured error for LLM consumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    pub severity: Severity,
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}
