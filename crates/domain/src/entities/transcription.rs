//! Output of the speech-recognition backend

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A single recognized token with timing and confidence
///
/// Holds raw observations only. Anything derived from it, such as whether
/// the word needs practice, lives on [`crate::WordAnalysis`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordObservation {
    pub word: String,
    /// Recognition confidence in [0, 1]
    pub confidence: f64,
    /// Seconds from the start of the recording
    pub start_time: f64,
    pub end_time: f64,
}

impl WordObservation {
    /// Create a validated observation
    ///
    /// # Errors
    ///
    /// Returns an error if the confidence lies outside [0, 1] or the word
    /// ends before it starts.
    pub fn new(
        word: impl Into<String>,
        confidence: f64,
        start_time: f64,
        end_time: f64,
    ) -> Result<Self, DomainError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(DomainError::InvalidConfidence(confidence));
        }
        if start_time > end_time {
            return Err(DomainError::InvalidTiming {
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self {
            word: word.into(),
            confidence,
            start_time,
            end_time,
        })
    }
}

/// Transcript, confidence and word details for one recognition call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TranscriptionResult {
    pub transcript: String,
    /// Confidence in [0, 1], zero when nothing was recognized
    pub confidence: f64,
    #[serde(default)]
    pub words: Vec<WordObservation>,
}

impl TranscriptionResult {
    #[must_use]
    pub fn new(transcript: impl Into<String>, confidence: f64) -> Self {
        Self {
            transcript: transcript.into(),
            confidence: confidence.clamp(0.0, 1.0),
            words: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_words(mut self, words: Vec<WordObservation>) -> Self {
        self.words = words;
        self
    }

    /// The result reported when the audio contained no recognizable speech
    #[must_use]
    pub fn no_speech() -> Self {
        Self::default()
    }

    /// True for an empty or whitespace-only transcript
    #[must_use]
    pub fn is_no_speech(&self) -> bool {
        self.transcript.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_observation_validates_confidence() {
        assert!(WordObservation::new("hi", 0.5, 0.0, 0.4).is_ok());
        assert!(matches!(
            WordObservation::new("hi", 1.2, 0.0, 0.4),
            Err(DomainError::InvalidConfidence(_))
        ));
        assert!(WordObservation::new("hi", -0.1, 0.0, 0.4).is_err());
    }

    #[test]
    fn word_observation_validates_timing() {
        assert!(WordObservation::new("hi", 0.5, 0.4, 0.4).is_ok());
        assert!(matches!(
            WordObservation::new("hi", 0.5, 0.5, 0.4),
            Err(DomainError::InvalidTiming { .. })
        ));
    }

    #[test]
    fn no_speech_is_empty() {
        let result = TranscriptionResult::no_speech();
        assert!(result.is_no_speech());
        assert!(result.words.is_empty());
        assert!(result.confidence.abs() < f64::EPSILON);
    }

    #[test]
    fn whitespace_transcript_counts_as_no_speech() {
        assert!(TranscriptionResult::new("   ", 0.3).is_no_speech());
        assert!(!TranscriptionResult::new("hello", 0.3).is_no_speech());
    }

    #[test]
    fn new_clamps_confidence() {
        let result = TranscriptionResult::new("hello", 1.4);
        assert!((result.confidence - 1.0).abs() < f64::EPSILON);
    }
}
