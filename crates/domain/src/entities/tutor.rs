//! Structured payloads produced by the language model

use serde::{Deserialize, Serialize};

use crate::fallback::{FallbackContext, ModelFallback, clamp_score, lenient};

/// Qualitative feedback on what the learner said
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LlmFeedback {
    #[serde(deserialize_with = "lenient::score")]
    pub accuracy_score: f64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub pronunciation_feedback: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub grammar_feedback: String,
    #[serde(deserialize_with = "lenient::score")]
    pub naturalness_score: f64,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub suggestions: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub correct_version: String,
}

impl ModelFallback for LlmFeedback {
    const KIND: &'static str = "pronunciation_feedback";

    /// Mid-range scores with the raw model text kept as the feedback
    fn fallback(ctx: &FallbackContext<'_>) -> Self {
        Self {
            accuracy_score: 50.0,
            pronunciation_feedback: ctx.raw_output.to_string(),
            grammar_feedback: String::new(),
            naturalness_score: 50.0,
            suggestions: Vec::new(),
            correct_version: ctx.user_text.to_string(),
        }
    }

    fn normalize(self) -> Self {
        Self {
            accuracy_score: clamp_score(self.accuracy_score),
            naturalness_score: clamp_score(self.naturalness_score),
            ..self
        }
    }
}

/// The tutor's next line in a practice conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationReply {
    #[serde(deserialize_with = "lenient::text")]
    pub response_text: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub response_translation_kr: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub key_phrases: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cultural_note: String,
}

impl ModelFallback for ConversationReply {
    const KIND: &'static str = "conversation_reply";

    fn fallback(_ctx: &FallbackContext<'_>) -> Self {
        Self {
            response_text: "សូមអភ័យទោស (Som aphey tos - Sorry)".to_string(),
            response_translation_kr: "죄송합니다".to_string(),
            key_phrases: Vec::new(),
            cultural_note: String::new(),
        }
    }
}

/// Assessment of a whole practice session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEvaluation {
    #[serde(deserialize_with = "lenient::score")]
    pub overall_score: f64,
    #[serde(deserialize_with = "lenient::score")]
    pub fluency_score: f64,
    #[serde(deserialize_with = "lenient::score")]
    pub vocabulary_score: f64,
    #[serde(deserialize_with = "lenient::score")]
    pub grammar_score: f64,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub areas_for_improvement: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub recommended_next_steps: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub encouraging_message: String,
}

impl ModelFallback for ConversationEvaluation {
    const KIND: &'static str = "conversation_evaluation";

    fn fallback(_ctx: &FallbackContext<'_>) -> Self {
        Self {
            overall_score: 70.0,
            fluency_score: 70.0,
            vocabulary_score: 70.0,
            grammar_score: 70.0,
            strengths: vec!["계속 연습하고 계십니다".to_string()],
            areas_for_improvement: vec!["더 많은 연습이 필요합니다".to_string()],
            recommended_next_steps: vec!["매일 대화 연습을 하세요".to_string()],
            encouraging_message: "잘하고 계십니다! 계속 노력하세요!".to_string(),
        }
    }

    fn normalize(self) -> Self {
        Self {
            overall_score: clamp_score(self.overall_score),
            fluency_score: clamp_score(self.fluency_score),
            vocabulary_score: clamp_score(self.vocabulary_score),
            grammar_score: clamp_score(self.grammar_score),
            ..self
        }
    }
}
