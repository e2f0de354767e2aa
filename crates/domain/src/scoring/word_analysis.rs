//! Per-word confidence analysis

use super::composite::round_to_tenth;
use crate::entities::{WordAnalysis, WordObservation};

/// Words recognized with less confidence than this need practice
pub const PRACTICE_THRESHOLD: f64 = 0.7;

#[must_use]
pub fn needs_practice(confidence: f64) -> bool {
    confidence < PRACTICE_THRESHOLD
}

/// Analyze each observation, preserving order
#[must_use]
pub fn analyze_words(words: &[WordObservation]) -> Vec<WordAnalysis> {
    words
        .iter()
        .map(|observation| WordAnalysis {
            word: observation.word.clone(),
            confidence_pct: round_to_tenth(observation.confidence * 100.0),
            start_time: observation.start_time,
            end_time: observation.end_time,
            needs_practice: needs_practice(observation.confidence),
        })
        .collect()
}
