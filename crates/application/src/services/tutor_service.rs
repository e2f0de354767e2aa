//! Tutor service - language-model backed feedback and conversation
//!
//! Builds prompts for the three tutoring tasks, asks the inference port for
//! JSON, and turns the raw text into typed payloads. Output that cannot be
//! parsed is replaced by the payload's neutral fallback and logged.

use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use domain::fallback::{ModelOutput, parse_model_output};
use domain::{
    ConversationEvaluation, ConversationMessage, ConversationReply, FallbackContext, LlmFeedback,
    ModelFallback, Scenario,
};
use tracing::{debug, instrument, warn};

use super::deadline::{DEFAULT_BACKEND_TIMEOUT, within};
use crate::{
    error::ApplicationError,
    ports::{InferencePort, PronunciationFeedbackPort},
};

/// Number of most recent messages included in a reply prompt
const HISTORY_WINDOW: usize = 5;

/// Service wrapping the inference port with the tutoring prompts
pub struct TutorService {
    inference: Arc<dyn InferencePort>,
    timeout: Duration,
}

impl fmt::Debug for TutorService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TutorService")
            .field("model", &self.inference.current_model())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl TutorService {
    /// Create a tutor with the default backend timeout
    pub fn new(inference: Arc<dyn InferencePort>) -> Self {
        Self::with_timeout(inference, DEFAULT_BACKEND_TIMEOUT)
    }

    /// Create a tutor with a custom backend timeout
    pub fn with_timeout(inference: Arc<dyn InferencePort>, timeout: Duration) -> Self {
        Self { inference, timeout }
    }

    /// Qualitative feedback on what the learner said
    ///
    /// `language` is the language name, e.g. "Khmer".
    #[instrument(skip(self, user_text, expected_text), fields(text_len = user_text.len(), has_expected = expected_text.is_some()))]
    pub async fn analyze_pronunciation(
        &self,
        user_text: &str,
        expected_text: Option<&str>,
        language: &str,
    ) -> Result<LlmFeedback, ApplicationError> {
        if user_text.trim().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "text must not be empty".to_string(),
            ));
        }

        let system = teacher_persona(language);
        let prompt = pronunciation_prompt(user_text, expected_text, language);
        let raw = self.generate(&system, &prompt, "pronunciation analysis").await?;

        Ok(parse_or_fallback(&raw, user_text))
    }

    /// The tutor's next line in a scenario role-play
    #[instrument(skip(self, user_input, history), fields(scenario = %scenario, history_len = history.len()))]
    pub async fn generate_reply(
        &self,
        user_input: &str,
        history: &[ConversationMessage],
        scenario: Scenario,
        language: &str,
    ) -> Result<ConversationReply, ApplicationError> {
        if user_input.trim().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "user_input must not be empty".to_string(),
            ));
        }

        let prompt = reply_prompt(user_input, history, language);
        let raw = self
            .generate(scenario.role_instruction(), &prompt, "conversation reply")
            .await?;

        Ok(parse_or_fallback(&raw, user_input))
    }

    /// Assessment of a whole practice session
    #[instrument(skip(self, history, learning_goals), fields(history_len = history.len(), goals = learning_goals.len()))]
    pub async fn evaluate_conversation(
        &self,
        history: &[ConversationMessage],
        learning_goals: &[String],
        language: &str,
    ) -> Result<ConversationEvaluation, ApplicationError> {
        if history.is_empty() {
            return Err(ApplicationError::InvalidInput(
                "conversation_history must not be empty".to_string(),
            ));
        }

        let system = format!(
            "You are evaluating a Korean volunteer's {language} language practice session."
        );
        let prompt = evaluation_prompt(history, learning_goals);
        let raw = self.generate(&system, &prompt, "conversation evaluation").await?;

        Ok(parse_or_fallback(&raw, ""))
    }

    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        operation: &'static str,
    ) -> Result<String, ApplicationError> {
        let start = Instant::now();
        let result = within(
            self.timeout,
            operation,
            self.inference.generate_json(system, prompt),
        )
        .await?;

        debug!(
            operation,
            model = %result.model,
            tokens = ?result.tokens_used,
            elapsed_ms = start.elapsed().as_millis(),
            "Model responded"
        );

        Ok(result.content)
    }
}

#[async_trait]
impl PronunciationFeedbackPort for TutorService {
    async fn analyze_pronunciation(
        &self,
        user_text: &str,
        expected_text: Option<String>,
        language: &str,
    ) -> Result<LlmFeedback, ApplicationError> {
        Self::analyze_pronunciation(self, user_text, expected_text.as_deref(), language).await
    }
}

/// Typed payload from model text, or its fallback
fn parse_or_fallback<T: ModelFallback>(raw: &str, user_text: &str) -> T {
    let output = parse_model_output::<T>(&FallbackContext::new(raw, user_text));
    if let ModelOutput::Recovered { reason, .. } = &output {
        warn!(kind = T::KIND, reason = %reason, "Model output was not valid JSON, using fallback");
    }
    output.into_inner()
}

fn teacher_persona(language: &str) -> String {
    format!(
        "You are a {language} language teacher helping Korean volunteers learn practical conversation skills."
    )
}

fn pronunciation_prompt(user_text: &str, expected_text: Option<&str>, language: &str) -> String {
    let mut prompt = format!("Analyze this {language} speech:\nUser said: \"{user_text}\"\n");
    if let Some(expected) = expected_text.filter(|e| !e.is_empty()) {
        let _ = writeln!(prompt, "Expected: \"{expected}\"");
    }
    let _ = write!(
        prompt,
        r#"
Provide a detailed analysis in JSON format:
{{
    "accuracy_score": 0-100,
    "pronunciation_feedback": "Clear, specific feedback in Korean",
    "grammar_feedback": "Grammar notes in Korean",
    "naturalness_score": 0-100,
    "suggestions": ["Practical improvement tips in Korean"],
    "correct_version": "Corrected {language} text if needed"
}}

Focus on practical communication, not academic perfection. Be encouraging but honest."#
    );
    prompt
}

/// Conversation lines as `role: content`, one per line
fn transcript(messages: &[ConversationMessage]) -> String {
    messages
        .iter()
        .map(ConversationMessage::transcript_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn reply_prompt(user_input: &str, history: &[ConversationMessage], language: &str) -> String {
    let recent = &history[history.len().saturating_sub(HISTORY_WINDOW)..];
    format!(
        r#"Previous conversation:
{context}

User just said: "{user_input}"

Generate a natural response in {language} that:
1. Continues the conversation naturally
2. Uses vocabulary appropriate for the scenario
3. Keeps responses short and conversational (1-2 sentences)
4. Helps the learner practice practical phrases

Respond in JSON format:
{{
    "response_text": "Your {language} response",
    "response_translation_kr": "한국어 번역",
    "key_phrases": ["Important phrases from your response with Korean translation"],
    "cultural_note": "Optional cultural tip in Korean"
}}"#,
        context = transcript(recent),
    )
}

fn evaluation_prompt(history: &[ConversationMessage], learning_goals: &[String]) -> String {
    let mut prompt = format!("Conversation:\n{}\n", transcript(history));
    if !learning_goals.is_empty() {
        let _ = writeln!(prompt, "\nLearning goals: {}", learning_goals.join(", "));
    }
    prompt.push_str(
        r#"
Provide a comprehensive evaluation in JSON format:
{
    "overall_score": 0-100,
    "fluency_score": 0-100,
    "vocabulary_score": 0-100,
    "grammar_score": 0-100,
    "strengths": ["List strengths in Korean"],
    "areas_for_improvement": ["List areas to work on in Korean"],
    "recommended_next_steps": ["Specific practice recommendations in Korean"],
    "encouraging_message": "Motivational message in Korean"
}

Be constructive and encouraging. Focus on practical progress."#,
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{InferenceResult, MockInferencePort};
    use mockall::predicate::*;

    fn mock_with_output(output: &'static str) -> MockInferencePort {
        let mut mock = MockInferencePort::new();
        mock.expect_generate_json()
            .returning(move |_, _| Ok(InferenceResult::text(output, "test-model")));
        mock.expect_current_model().return_const("test-model".to_string());
        mock
    }

    #[tokio::test]
    async fn analyze_pronunciation_parses_feedback() {
        let mock = mock_with_output(
            r#"{"accuracy_score": 85, "pronunciation_feedback": "좋아요", "grammar_feedback": "",
                "naturalness_score": 78, "suggestions": ["천천히"], "correct_version": "សួស្តី"}"#,
        );
        let service = TutorService::new(Arc::new(mock));

        let feedback = service
            .analyze_pronunciation("សួស្តី", Some("សួស្តី"), "Khmer")
            .await
            .unwrap();

        assert!((feedback.accuracy_score - 85.0).abs() < f64::EPSILON);
        assert_eq!(feedback.pronunciation_feedback, "좋아요");
        assert_eq!(feedback.suggestions, vec!["천천히"]);
    }

    #[tokio::test]
    async fn analyze_pronunciation_falls_back_on_prose() {
        let mock = mock_with_output("The pronunciation was mostly clear.");
        let service = TutorService::new(Arc::new(mock));

        let feedback = service
            .analyze_pronunciation("sok sabay", None, "Khmer")
            .await
            .unwrap();

        assert!((feedback.accuracy_score - 50.0).abs() < f64::EPSILON);
        assert!((feedback.naturalness_score - 50.0).abs() < f64::EPSILON);
        assert_eq!(feedback.pronunciation_feedback, "The pronunciation was mostly clear.");
        assert_eq!(feedback.correct_version, "sok sabay");
        assert!(feedback.suggestions.is_empty());
    }

    #[tokio::test]
    async fn analyze_pronunciation_prompt_names_language_and_expected_text() {
        let mut mock = MockInferencePort::new();
        mock.expect_generate_json()
            .withf(|system, prompt| {
                system.contains("You are a Lao language teacher")
                    && prompt.contains("User said: \"sabaidee\"")
                    && prompt.contains("Expected: \"ສະບາຍດີ\"")
            })
            .times(1)
            .returning(|_, _| Ok(InferenceResult::text("{}", "test-model")));
        let service = TutorService::new(Arc::new(mock));

        let feedback = service
            .analyze_pronunciation("sabaidee", Some("ສະບາຍດີ"), "Lao")
            .await
            .unwrap();

        // "{}" lacks the required scores
        assert!((feedback.accuracy_score - 50.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn analyze_pronunciation_rejects_empty_text() {
        let service = TutorService::new(Arc::new(MockInferencePort::new()));
        let result = service.analyze_pronunciation("  ", None, "Khmer").await;
        assert!(matches!(result, Err(ApplicationError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn inference_errors_propagate() {
        let mut mock = MockInferencePort::new();
        mock.expect_generate_json()
            .returning(|_, _| Err(ApplicationError::Inference("quota".into())));
        let service = TutorService::new(Arc::new(mock));

        let result = service.analyze_pronunciation("hello", None, "Khmer").await;
        assert!(matches!(result, Err(ApplicationError::Inference(_))));
    }

    #[tokio::test]
    async fn generate_reply_uses_scenario_role_and_recent_history() {
        let history: Vec<ConversationMessage> = (0..8)
            .map(|i| ConversationMessage::user(format!("line {i}")))
            .collect();

        let mut mock = MockInferencePort::new();
        mock.expect_generate_json()
            .with(
                eq(Scenario::Market.role_instruction()),
                function(|prompt: &str| {
                    !prompt.contains("line 2") && prompt.contains("user: line 3") && prompt.contains("line 7")
                }),
            )
            .times(1)
            .returning(|_, _| {
                Ok(InferenceResult::text(
                    "```json\n{\"response_text\": \"ថ្លៃប៉ុន្មាន?\", \"response_translation_kr\": \"얼마예요?\", \"key_phrases\": [\"ថ្លៃ\"]}\n```",
                    "test-model",
                ))
            });
        let service = TutorService::new(Arc::new(mock));

        let reply = service
            .generate_reply("ជំរាបសួរ", &history, Scenario::Market, "Khmer")
            .await
            .unwrap();

        assert_eq!(reply.response_text, "ថ្លៃប៉ុន្មាន?");
        assert_eq!(reply.response_translation_kr, "얼마예요?");
        assert_eq!(reply.key_phrases, vec!["ថ្លៃ"]);
        assert!(reply.cultural_note.is_empty());
    }

    #[tokio::test]
    async fn generate_reply_falls_back_to_apology() {
        let service = TutorService::new(Arc::new(mock_with_output("not json at all")));

        let reply = service
            .generate_reply("hello", &[], Scenario::General, "Khmer")
            .await
            .unwrap();

        assert_eq!(reply.response_text, "សូមអភ័យទោស (Som aphey tos - Sorry)");
        assert_eq!(reply.response_translation_kr, "죄송합니다");
    }

    #[tokio::test]
    async fn evaluate_conversation_includes_goals() {
        let mut mock = MockInferencePort::new();
        mock.expect_generate_json()
            .withf(|system, prompt| {
                system.contains("Vietnamese")
                    && prompt.contains("assistant: Xin chào")
                    && prompt.contains("Learning goals: greetings, numbers")
            })
            .times(1)
            .returning(|_, _| {
                Ok(InferenceResult::text(
                    r#"{"overall_score": 120, "fluency_score": 80, "vocabulary_score": 75,
                        "grammar_score": 70, "strengths": ["인사"], "encouraging_message": "좋아요"}"#,
                    "test-model",
                ))
            });
        let service = TutorService::new(Arc::new(mock));

        let history = vec![
            ConversationMessage::assistant("Xin chào"),
            ConversationMessage::user("Chào bạn"),
        ];
        let goals = vec!["greetings".to_string(), "numbers".to_string()];

        let evaluation = service
            .evaluate_conversation(&history, &goals, "Vietnamese")
            .await
            .unwrap();

        assert!((evaluation.overall_score - 100.0).abs() < f64::EPSILON);
        assert_eq!(evaluation.strengths, vec!["인사"]);
        assert!(evaluation.areas_for_improvement.is_empty());
    }

    #[tokio::test]
    async fn evaluate_conversation_falls_back_to_seventies() {
        let service = TutorService::new(Arc::new(mock_with_output("{broken")));

        let evaluation = service
            .evaluate_conversation(&[ConversationMessage::user("hi")], &[], "Khmer")
            .await
            .unwrap();

        assert!((evaluation.overall_score - 70.0).abs() < f64::EPSILON);
        assert!((evaluation.grammar_score - 70.0).abs() < f64::EPSILON);
        assert_eq!(evaluation.encouraging_message, "잘하고 계십니다! 계속 노력하세요!");
    }

    #[tokio::test]
    async fn evaluate_conversation_requires_history() {
        let service = TutorService::new(Arc::new(MockInferencePort::new()));
        let result = service.evaluate_conversation(&[], &[], "Khmer").await;
        assert!(matches!(result, Err(ApplicationError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn feedback_port_delegates() {
        let service = TutorService::new(Arc::new(mock_with_output(
            r#"{"accuracy_score": 90, "naturalness_score": 88}"#,
        )));
        let port: &dyn PronunciationFeedbackPort = &service;

        let feedback = port
            .analyze_pronunciation("hello", Some("hello".to_string()), "Khmer")
            .await
            .unwrap();
        assert!((feedback.naturalness_score - 88.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reply_prompt_with_short_history() {
        let prompt = reply_prompt("hi", &[ConversationMessage::assistant("hello")], "Lao");
        assert!(prompt.starts_with("Previous conversation:\nassistant: hello\n"));
        assert!(prompt.contains("Generate a natural response in Lao"));
    }

    #[test]
    fn pronunciation_prompt_omits_empty_expected_text() {
        let prompt = pronunciation_prompt("hi", Some(""), "Khmer");
        assert!(!prompt.contains("Expected:"));
    }

    #[test]
    fn pronunciation_prompt_keeps_expected_text_verbatim() {
        let prompt = pronunciation_prompt("hi", Some(" hi "), "Khmer");
        assert!(prompt.contains("Expected: \" hi \""));
    }
}
