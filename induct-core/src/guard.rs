//! Denial-of-service guards
//!
//! `InputGuard` bounds the size and magnitude of a sequence before any
//! detector sees it. `TimeoutGuard` bounds the wall-clock time of a single
//! call through cooperative checkpoints.

use crate::{TimeoutError, ValidationError};
use std::time::{Duration, Instant};

/// Maximum number of elements accepted in one call
pub const MAX_SEQUENCE_LENGTH: usize = 10_000;

/// Wall-clock budget for one call
pub const COMPUTATION_TIMEOUT_SECONDS: f64 = 5.0;

/// Largest magnitude accepted for an input element or reconstructed value
pub const VALUE_MAGNITUDE_LIMIT: f64 = 1e15;

/// Loop iterations between timeout checks
pub const CHECKPOINT_INTERVAL: usize = 1000;

/// Validates sequences before computation
pub struct InputGuard;

impl InputGuard {
    /// Check length, finiteness and magnitude. O(n), always scans to the end
    /// or the first offending element.
    pub fn validate(sequence: &[f64]) -> Result<(), ValidationError> {
        if sequence.len() > MAX_SEQUENCE_LENGTH {
            return Err(ValidationError::TooLarge {
                length: sequence.len(),
                max: MAX_SEQUENCE_LENGTH,
            });
        }

        for (index, &value) in sequence.iter().enumerate() {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite { index, value });
            }
            if value.abs() > VALUE_MAGNITUDE_LIMIT {
                return Err(ValidationError::MagnitudeExceeded {
                    index,
                    value,
                    limit: VALUE_MAGNITUDE_LIMIT,
                });
            }
        }

        Ok(())
    }

    pub fn validate_non_empty(sequence: &[f64]) -> Result<(), ValidationError> {
        if sequence.is_empty() {
            return Err(ValidationError::Empty);
        }
        Ok(())
    }
}

/// Cooperative time budget for a single call
#[derive(Debug, Clone)]
pub struct TimeoutGuard {
    start: Instant,
    budget: Duration,
    interval: usize,
}

impl TimeoutGuard {
    /// Start the clock now
    pub fn new(budget: Duration) -> Self {
        Self::with_start(Instant::now(), budget)
    }

    pub fn with_start(start: Instant, budget: Duration) -> Self {
        Self {
            start,
            budget,
            interval: CHECKPOINT_INTERVAL,
        }
    }

    /// Iterations between checks made by `checkpoint_at`. Zero is treated as one.
    pub fn with_interval(mut self, interval: usize) -> Self {
        self.interval = interval.max(1);
        self
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Fail once the elapsed time exceeds the budget
    pub fn checkpoint(&self) -> Result<(), TimeoutError> {
        let elapsed = self.start.elapsed();
        if elapsed > self.budget {
            return Err(TimeoutError {
                elapsed,
                budget: self.budget,
            });
        }
        Ok(())
    }

    /// Loop checkpoint: only checks the clock on multiples of the interval
    pub fn checkpoint_at(&self, iteration: usize) -> Result<(), TimeoutError> {
        if iteration % self.interval == 0 {
            self.checkpoint()?;
        }
        Ok(())
    }
}

impl Default for TimeoutGuard {
    fn default() -> Self {
        Self::new(Duration::from_secs_f64(COMPUTATION_TIMEOUT_SECONDS))
    }
}
