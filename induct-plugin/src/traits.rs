//! Plugin traits

use induct_core::{EngineError, PatternMatch, TimeoutGuard, ToleranceConfig};
use serde::Serialize;

/// Metadata for a detector plugin
#[derive(Debug, Clone, Serialize)]
pub struct DetectorMeta {
    pub name: &'static str,
    pub description: &'static str,
    /// Shortest sequence the detector will consider
    pub min_length: usize,
    /// Pattern tags the detector can report
    pub detects: &'static [&'static str],
}

/// Stateless detector for one pattern family.
///
/// Not matching is `Ok(None)`. Errors are reserved for timeouts and
/// numeric overflow; detectors never hide either.
pub trait PatternDetector: Send + Sync {
    fn meta(&self) -> DetectorMeta;

    fn detect(
        &self,
        sequence: &[f64],
        tolerance: &ToleranceConfig,
        guard: &TimeoutGuard,
    ) -> Result<Option<PatternMatch>, EngineError>;
}
