//! Pronunciation feedback port - qualitative assessment of what a learner said

use async_trait::async_trait;
use domain::LlmFeedback;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port producing qualitative feedback for a recognized utterance
///
/// Unparseable model output is not an error here: implementations return
/// `LlmFeedback`'s neutral fallback instead.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PronunciationFeedbackPort: Send + Sync {
    /// Assess `user_text` against an optional `expected_text`
    ///
    /// `language` is the human-readable language name, e.g. "Khmer".
    async fn analyze_pronunciation(
        &self,
        user_text: &str,
        expected_text: Option<String>,
        language: &str,
    ) -> Result<LlmFeedback, ApplicationError>;
}
