//! Pronunciation evaluation results

use serde::{Deserialize, Serialize};

use super::tutor::LlmFeedback;
use crate::value_objects::Grade;

/// Learner-facing message for a recording without speech
pub const NO_SPEECH_FEEDBACK: &str = "음성이 감지되지 않았습니다. 다시 시도해주세요.";

/// Per-word scoring derived from a [`crate::WordObservation`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordAnalysis {
    pub word: String,
    /// Confidence as a percentage rounded to one decimal
    #[serde(rename = "confidence")]
    pub confidence_pct: f64,
    pub start_time: f64,
    pub end_time: f64,
    pub needs_practice: bool,
}

/// Complete result of a pronunciation evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PronunciationEvaluation {
    pub overall_score: f64,
    #[serde(rename = "stt_confidence")]
    pub stt_confidence_pct: f64,
    #[serde(rename = "similarity_score")]
    pub similarity_score_pct: f64,
    pub transcription: String,
    /// Empty when no reference text was supplied
    pub expected_text: String,
    pub word_analysis: Vec<WordAnalysis>,
    pub llm_feedback: LlmFeedback,
    pub pronunciation_feedback: String,
    pub suggestions: Vec<String>,
    pub grade: Grade,
}

/// Terminal result for a recording where nothing was recognized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoSpeechResult {
    pub error: String,
    pub overall_score: f64,
    pub feedback: String,
}

impl Default for NoSpeechResult {
    fn default() -> Self {
        Self {
            error: "No speech detected".to_string(),
            overall_score: 0.0,
            feedback: NO_SPEECH_FEEDBACK.to_string(),
        }
    }
}

/// Either a full evaluation or the no-speech short circuit
///
/// Serialized without a tag so clients see one of the two flat shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PronunciationOutcome {
    Evaluated(Box<PronunciationEvaluation>),
    NoSpeechDetected(NoSpeechResult),
}

impl PronunciationOutcome {
    #[must_use]
    pub fn overall_score(&self) -> f64 {
        match self {
            Self::Evaluated(evaluation) => evaluation.overall_score,
            Self::NoSpeechDetected(result) => result.overall_score,
        }
    }

    #[must_use]
    pub fn evaluation(&self) -> Option<&PronunciationEvaluation> {
        match self {
            Self::Evaluated(evaluation) => Some(evaluation),
            Self::NoSpeechDetected(_) => None,
        }
    }

    #[must_use]
    pub const fn is_no_speech(&self) -> bool {
        matches!(self, Self::NoSpeechDetected(_))
    }
}

/// Practice advice derived from an evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Recommendation {
    pub focus_areas: Vec<String>,
    /// At most five words, in the order they were spoken
    pub practice_words: Vec<String>,
    pub next_steps: Vec<String>,
}
