//! Induct Plugin System
//!
//! Provides the seams between the engine and its parts:
//! - Detectors (one pattern family each)
//! - Detector chains (ordered precedence, first hit wins)
//! - Step sinks (external reasoning logs)

mod traits;
mod registry;
mod sink;

pub use traits::{PatternDetector, DetectorMeta};
pub use registry::DetectorChain;
pub use sink::{StepSink, ReasoningStep, ReasoningTrace};

/// Re-export core types for detector authors
pub mod prelude {
    pub use crate::{
        PatternDetector, DetectorMeta, DetectorChain,
        StepSink, ReasoningStep, ReasoningTrace,
    };
    pub use induct_core::prelude::*;
}
