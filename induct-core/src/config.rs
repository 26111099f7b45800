//! Engine configuration

use crate::guard::{CHECKPOINT_INTERVAL, COMPUTATION_TIMEOUT_SECONDS};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::warn;

/// Highest polynomial degree tried by default
pub const DEFAULT_MAX_POLYNOMIAL_DEGREE: usize = 3;

pub const ENV_TIMEOUT_SECS: &str = "INDUCT_TIMEOUT_SECS";
pub const ENV_CHECKPOINT_INTERVAL: &str = "INDUCT_CHECKPOINT_INTERVAL";
pub const ENV_MAX_POLY_DEGREE: &str = "INDUCT_MAX_POLY_DEGREE";

/// Settings shared by every call an engine serves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub timeout: Duration,
    pub checkpoint_interval: usize,
    pub max_polynomial_degree: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs_f64(COMPUTATION_TIMEOUT_SECONDS),
            checkpoint_interval: CHECKPOINT_INTERVAL,
            max_polynomial_degree: DEFAULT_MAX_POLYNOMIAL_DEGREE,
        }
    }
}

impl EngineConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_checkpoint_interval(mut self, interval: usize) -> Self {
        self.checkpoint_interval = interval.max(1);
        self
    }

    pub fn with_max_polynomial_degree(mut self, degree: usize) -> Self {
        self.max_polynomial_degree = degree.max(1);
        self
    }

    /// Defaults overridden by `INDUCT_*` environment variables.
    /// Malformed values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<f64>() {
                Ok(secs) if secs.is_finite() && secs > 0.0 => {
                    config = config.with_timeout(Duration::from_secs_f64(secs));
                }
                _ => warn!(var = ENV_TIMEOUT_SECS, value = %raw, "ignoring invalid timeout"),
            }
        }

        if let Some(raw) = lookup(ENV_CHECKPOINT_INTERVAL) {
            match raw.trim().parse::<usize>() {
                Ok(interval) => config = config.with_checkpoint_interval(interval),
                Err(_) => warn!(var = ENV_CHECKPOINT_INTERVAL, value = %raw, "ignoring invalid checkpoint interval"),
            }
        }

        if let Some(raw) = lookup(ENV_MAX_POLY_DEGREE) {
            match raw.trim().parse::<usize>() {
                Ok(degree) => config = config.with_max_polynomial_degree(degree),
                Err(_) => warn!(var = ENV_MAX_POLY_DEGREE, value = %raw, "ignoring invalid polynomial degree"),
            }
        }

        config
    }
}
