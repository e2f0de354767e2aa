//! Conversation service - role-play practice over text and voice

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use domain::{
    ConversationEvaluation, ConversationMessage, ConversationReply, Language, LlmFeedback,
    Scenario,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{SpeechService, TutorService};
use crate::{error::ApplicationError, ports::SynthesisOptions};

/// What the learner said in a voice turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInput {
    pub transcript: String,
    pub confidence: f64,
}

/// The tutor's answer in a voice turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiResponse {
    pub text: String,
    pub translation_kr: String,
    pub key_phrases: Vec<String>,
    pub cultural_note: String,
    /// Base64 encoded MP3 of `text`
    pub audio: String,
}

/// One spoken turn and the spoken reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceConversationResult {
    pub user_input: UserInput,
    pub ai_response: AiResponse,
}

/// Service driving practice conversations
pub struct ConversationService {
    tutor: Arc<TutorService>,
    speech: Arc<SpeechService>,
}

impl fmt::Debug for ConversationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversationService").finish_non_exhaustive()
    }
}

impl ConversationService {
    pub fn new(tutor: Arc<TutorService>, speech: Arc<SpeechService>) -> Self {
        Self { tutor, speech }
    }

    /// Reply to a typed message
    ///
    /// `language` is the language name, e.g. "Khmer".
    pub async fn send_message(
        &self,
        user_input: &str,
        history: &[ConversationMessage],
        scenario: Scenario,
        language: &str,
    ) -> Result<ConversationReply, ApplicationError> {
        self.tutor
            .generate_reply(user_input, history, scenario, language)
            .await
    }

    /// Transcribe a spoken turn, reply to it and voice the reply
    ///
    /// Each voice turn starts a fresh conversation; no history is sent to the
    /// model. Codes outside the catalogue are answered in Khmer.
    ///
    /// # Errors
    ///
    /// Silent audio is `InvalidInput`. Backend failures propagate.
    #[instrument(skip(self, audio), fields(audio_size = audio.len(), scenario = %scenario))]
    pub async fn voice_conversation(
        &self,
        audio: Vec<u8>,
        scenario: Scenario,
        language_code: &str,
    ) -> Result<VoiceConversationResult, ApplicationError> {
        let start = Instant::now();

        let transcription = self.speech.transcribe(audio, language_code).await?;
        if transcription.is_no_speech() {
            return Err(ApplicationError::InvalidInput(
                "No speech detected in audio".to_string(),
            ));
        }

        let language = Language::from_code(language_code).unwrap_or_default();
        let reply = self
            .tutor
            .generate_reply(&transcription.transcript, &[], scenario, language.name())
            .await?;

        let speech = self
            .speech
            .synthesize(&reply.response_text, &SynthesisOptions::new(language_code))
            .await?;

        info!(
            transcript_len = transcription.transcript.len(),
            audio_bytes = speech.audio_data.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Voice turn completed"
        );

        Ok(VoiceConversationResult {
            user_input: UserInput {
                transcript: transcription.transcript,
                confidence: transcription.confidence,
            },
            ai_response: AiResponse {
                text: reply.response_text,
                translation_kr: reply.response_translation_kr,
                key_phrases: reply.key_phrases,
                cultural_note: reply.cultural_note,
                audio: STANDARD.encode(&speech.audio_data),
            },
        })
    }

    /// Assess a finished session
    pub async fn evaluate(
        &self,
        history: &[ConversationMessage],
        learning_goals: &[String],
        language: &str,
    ) -> Result<ConversationEvaluation, ApplicationError> {
        self.tutor
            .evaluate_conversation(history, learning_goals, language)
            .await
    }

    /// Grammar and naturalness feedback on typed text
    pub async fn analyze_text(
        &self,
        text: &str,
        expected_text: Option<&str>,
        language: &str,
    ) -> Result<LlmFeedback, ApplicationError> {
        self.tutor
            .analyze_pronunciation(text, expected_text, language)
            .await
    }
}
