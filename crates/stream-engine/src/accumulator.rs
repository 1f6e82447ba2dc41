//! Confidence-gated, de-duplicating symbol accumulation.
//!
//! The classifier fires many times per second while a sign is held. Only a
//! top candidate at or above the acceptance threshold is considered, and it
//! is appended only when it differs from the last accepted symbol. Repeating
//! a symbol therefore needs a different (or absent) observation in between.

use std::fmt;

use serde::Serialize;
use signlang_common::config::DEFAULT_ACCEPT_THRESHOLD;
use signlang_gesture_model::TopCandidate;

/// What an observation did to the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserveOutcome {
    /// No gesture in the frame.
    Absent,
    /// Candidate confidence under the threshold.
    BelowThreshold,
    /// Confident candidate equal to the last accepted symbol.
    Repeated,
    /// Candidate appended to the sequence.
    Accepted,
}

impl ObserveOutcome {
    pub fn mutated(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Immutable copy of the accumulated sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct WordSnapshot {
    symbols: Vec<String>,
}

impl WordSnapshot {
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Symbols concatenated in order.
    pub fn joined(&self) -> String {
        self.symbols.concat()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl fmt::Display for WordSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            f.write_str(symbol)?;
        }
        Ok(())
    }
}

/// Owns the accepted symbol sequence.
#[derive(Debug, Clone)]
pub struct SequenceAccumulator {
    symbols: Vec<String>,
    threshold: f32,
}

impl SequenceAccumulator {
    pub fn new(threshold: f32) -> Self {
        Self {
            symbols: Vec::new(),
            threshold,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_ACCEPT_THRESHOLD)
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Feed one top candidate (or its absence) into the sequence.
    pub fn observe(&mut self, candidate: Option<&TopCandidate>) -> ObserveOutcome {
        let Some(candidate) = candidate else {
            return ObserveOutcome::Absent;
        };
        if candidate.confidence.is_nan() || candidate.confidence < self.threshold {
            return ObserveOutcome::BelowThreshold;
        }
        if self.symbols.last() == Some(&candidate.label) {
            return ObserveOutcome::Repeated;
        }
        self.symbols.push(candidate.label.clone());
        ObserveOutcome::Accepted
    }

    /// Clear the sequence.
    pub fn reset(&mut self) {
        self.symbols.clear();
    }

    pub fn current(&self) -> WordSnapshot {
        WordSnapshot {
            symbols: self.symbols.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for SequenceAccumulator {
    fn default() -> Self {
        Self::with_defaults()
    }
}
