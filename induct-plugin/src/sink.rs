//! Step sinks
//!
//! The engine reports the outcome of each top-level call to an optional
//! sink. The reasoning log that ultimately stores steps lives outside this
//! workspace; `ReasoningTrace` is the in-memory form used by tests and
//! simple callers.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Single step reported to a sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub stage: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub assumptions: Vec<String>,
}

impl ReasoningStep {
    pub fn new(stage: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            description: description.into(),
            result: None,
            confidence: 0.0,
            evidence: None,
            assumptions: Vec::new(),
        }
    }

    pub fn with_result(mut self, result: JsonValue) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }

    pub fn with_assumption(mut self, assumption: impl Into<String>) -> Self {
        self.assumptions.push(assumption.into());
        self
    }
}

/// Receiver of reasoning steps
pub trait StepSink {
    fn record_step(&mut self, step: ReasoningStep);
}

impl StepSink for Vec<ReasoningStep> {
    fn record_step(&mut self, step: ReasoningStep) {
        self.push(step);
    }
}

/// Ordered in-memory log of steps
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReasoningTrace {
    pub steps: Vec<ReasoningStep>,
}

impl ReasoningTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&ReasoningStep> {
        self.steps.last()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }
}

impl StepSink for ReasoningTrace {
    fn record_step(&mut self, step: ReasoningStep) {
        self.steps.push(step);
    }
}
