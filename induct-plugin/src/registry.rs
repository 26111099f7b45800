//! Detector chain
//!
//! An ordered list of detectors tried in sequence until the first hit.
//! Order is precedence: earlier detectors shadow later ones.

use crate::{DetectorMeta, PatternDetector};
use induct_core::{EngineError, PatternMatch, TimeoutGuard, ToleranceConfig};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Ordered detector cascade
#[derive(Clone, Default)]
pub struct DetectorChain {
    detectors: Vec<Arc<dyn PatternDetector>>,
}

impl DetectorChain {
    pub fn new() -> Self {
        Self { detectors: Vec::new() }
    }

    /// Append a detector; it runs after every detector already present
    pub fn with_detector<D: PatternDetector + 'static>(mut self, d: D) -> Self {
        self.detectors.push(Arc::new(d));
        self
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    pub fn get_detector(&self, name: &str) -> Option<&dyn PatternDetector> {
        self.detectors
            .iter()
            .find(|d| d.meta().name.eq_ignore_ascii_case(name))
            .map(|d| d.as_ref())
    }

    /// Metadata in precedence order
    pub fn list_detectors(&self) -> Vec<DetectorMeta> {
        self.detectors.iter().map(|d| d.meta()).collect()
    }

    /// Run detectors in order and return the first match.
    ///
    /// The guard is checked before each detector. A detector that overflows
    /// is skipped; timeouts and validation errors end the cascade.
    pub fn first_match(
        &self,
        sequence: &[f64],
        tolerance: &ToleranceConfig,
        guard: &TimeoutGuard,
    ) -> Result<Option<PatternMatch>, EngineError> {
        for detector in &self.detectors {
            guard.checkpoint()?;
            let meta = detector.meta();

            if sequence.len() < meta.min_length {
                trace!(detector = meta.name, length = sequence.len(), "sequence shorter than detector minimum");
                continue;
            }

            match detector.detect(sequence, tolerance, guard) {
                Ok(Some(found)) => {
                    debug!(
                        detector = meta.name,
                        pattern = %found.pattern_type(),
                        confidence = found.confidence,
                        "pattern accepted"
                    );
                    return Ok(Some(found));
                }
                Ok(None) => {
                    trace!(detector = meta.name, "no match");
                }
                Err(e) if e.is_overflow() => {
                    warn!(detector = meta.name, error = %e, "detector overflowed, trying next");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }
}

impl std::fmt::Debug for DetectorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.detectors.iter().map(|d| d.meta().name).collect();
        f.debug_struct("DetectorChain").field("detectors", &names).finish()
    }
}
