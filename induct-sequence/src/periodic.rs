//! Repeating structure: alternating steps and periodic tiling

use crate::helpers::differences;
use induct_core::{format_value, EngineError, PatternKind, PatternMatch, TimeoutGuard, ToleranceConfig};
use induct_plugin::{DetectorMeta, PatternDetector};

pub const ALTERNATING_CONFIDENCE: f64 = 0.8;
pub const PERIODIC_CONFIDENCE: f64 = 0.85;

/// Periods are searched below this bound (and below half the length)
pub const MAX_PERIOD_EXCLUSIVE: usize = 6;

pub const MIN_LENGTH: usize = 6;

fn signed(value: f64) -> String {
    if value < 0.0 {
        format_value(value)
    } else {
        format!("+{}", format_value(value))
    }
}

/// Two step sizes applied in turn, e.g. +2, +3, +2, +3
fn alternating(sequence: &[f64], guard: &TimeoutGuard) -> Result<Option<PatternMatch>, EngineError> {
    let diffs = differences(sequence, guard)?;
    if diffs.len() < 4 {
        return Ok(None);
    }

    let even: Vec<f64> = diffs.iter().step_by(2).copied().collect();
    let odd: Vec<f64> = diffs.iter().skip(1).step_by(2).copied().collect();
    if even.len() < 2 || odd.len() < 2 {
        return Ok(None);
    }

    let tol = ToleranceConfig::ALTERNATING;
    if !tol.all_close_to(&even, even[0]) || !tol.all_close_to(&odd, odd[0]) {
        return Ok(None);
    }

    let (step1, step2) = (even[0], odd[0]);
    let last = sequence[sequence.len() - 1];
    let (next, description) = if diffs.len() % 2 == 0 {
        (last + step1, format!("Alternating: {}, {} repeating", signed(step1), signed(step2)))
    } else {
        (last + step2, format!("Alternating: {}, {} repeating", signed(step2), signed(step1)))
    };

    Ok(Some(PatternMatch::new(
        PatternKind::AlternatingSteps { steps: [step1, step2] },
        next,
        ALTERNATING_CONFIDENCE,
        description,
    )))
}

/// First `period` terms repeated across the whole sequence
fn tiled(sequence: &[f64], period: usize, guard: &TimeoutGuard) -> Result<Option<PatternMatch>, EngineError> {
    let pattern = &sequence[..period];
    let tol = ToleranceConfig::PERIODIC;

    for (i, &value) in sequence.iter().enumerate() {
        guard.checkpoint_at(i)?;
        if !tol.is_close(value, pattern[i % period]) {
            return Ok(None);
        }
    }

    let rendered: Vec<String> = pattern.iter().map(|&v| format_value(v)).collect();
    Ok(Some(PatternMatch::new(
        PatternKind::Periodic { period, pattern: pattern.to_vec() },
        pattern[sequence.len() % period],
        PERIODIC_CONFIDENCE,
        format!("Periodic pattern with period {}: [{}]", period, rendered.join(", ")),
    )))
}

/// Alternating-step and periodic sequences
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodicDetector;

impl PeriodicDetector {
    /// Every repeating structure found: alternating first, then periods ascending
    pub fn detect_all(&self, sequence: &[f64], guard: &TimeoutGuard) -> Result<Vec<PatternMatch>, EngineError> {
        let mut found = Vec::new();
        if sequence.len() < MIN_LENGTH {
            return Ok(found);
        }

        if let Some(m) = alternating(sequence, guard)? {
            found.push(m);
        }

        let upper = (sequence.len() / 2).min(MAX_PERIOD_EXCLUSIVE);
        for period in 2..upper {
            guard.checkpoint()?;
            if let Some(m) = tiled(sequence, period, guard)? {
                found.push(m);
            }
        }

        Ok(found)
    }
}

impl PatternDetector for PeriodicDetector {
    fn meta(&self) -> DetectorMeta {
        DetectorMeta {
            name: "periodic",
            description: "Alternating steps or a repeating block of terms",
            min_length: MIN_LENGTH,
            detects: &["alternating_steps", "periodic"],
        }
    }

    /// Highest confidence of [`PeriodicDetector::detect_all`]; ties keep the earlier match
    fn detect(
        &self,
        sequence: &[f64],
        _tolerance: &ToleranceConfig,
        guard: &TimeoutGuard,
    ) -> Result<Option<PatternMatch>, EngineError> {
        let mut best: Option<PatternMatch> = None;
        for candidate in self.detect_all(sequence, guard)? {
            match &best {
                Some(current) if candidate.confidence <= current.confidence => {}
                _ => best = Some(candidate),
            }
        }
        Ok(best)
    }
}
