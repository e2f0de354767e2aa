//! Pronunciation service - evaluates a spoken attempt end to end
//!
//! Flow:
//! 1. Transcribe the audio with word timings
//! 2. Stop with a no-speech outcome when nothing was recognized
//! 3. Ask for qualitative feedback while similarity and word analysis run
//! 4. Combine everything into a composite score and grade

use std::{fmt, sync::Arc, time::Duration, time::Instant};

use domain::scoring::{analyze_words, composite_score, recommend, round_to_tenth, similarity};
use domain::{
    Grade, NoSpeechResult, PronunciationEvaluation, PronunciationOutcome, Recommendation,
    WordAnalysis, language_name,
};
use tracing::{debug, info, instrument};

use super::deadline::{DEFAULT_BACKEND_TIMEOUT, within};
use crate::{
    error::ApplicationError,
    ports::{PronunciationFeedbackPort, SpeechRecognitionPort},
};

/// Service orchestrating recognition, scoring and feedback
pub struct PronunciationService {
    recognizer: Arc<dyn SpeechRecognitionPort>,
    feedback: Arc<dyn PronunciationFeedbackPort>,
    timeout: Duration,
}

impl fmt::Debug for PronunciationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PronunciationService")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl PronunciationService {
    /// Create a new pronunciation service
    pub fn new(
        recognizer: Arc<dyn SpeechRecognitionPort>,
        feedback: Arc<dyn PronunciationFeedbackPort>,
    ) -> Self {
        Self::with_timeout(recognizer, feedback, DEFAULT_BACKEND_TIMEOUT)
    }

    /// Create a pronunciation service with a custom backend timeout
    pub fn with_timeout(
        recognizer: Arc<dyn SpeechRecognitionPort>,
        feedback: Arc<dyn PronunciationFeedbackPort>,
        timeout: Duration,
    ) -> Self {
        Self {
            recognizer,
            feedback,
            timeout,
        }
    }

    /// Evaluate one recorded attempt
    ///
    /// An empty `expected_text` is treated as absent, which scores similarity
    /// at 100. Any other value, whitespace included, is scored as given.
    ///
    /// # Errors
    ///
    /// Empty audio is `InvalidInput`. Recognition and feedback failures are
    /// propagated without retry.
    #[instrument(skip(self, audio, expected_text), fields(audio_size = audio.len(), has_expected = expected_text.is_some()))]
    pub async fn evaluate(
        &self,
        audio: Vec<u8>,
        expected_text: Option<&str>,
        language_code: &str,
    ) -> Result<PronunciationOutcome, ApplicationError> {
        if audio.is_empty() {
            return Err(ApplicationError::InvalidInput(
                "Audio data is empty".to_string(),
            ));
        }

        let start = Instant::now();

        let transcription = within(
            self.timeout,
            "speech recognition",
            self.recognizer.transcribe(audio, language_code, true),
        )
        .await?;

        if transcription.is_no_speech() {
            info!("No speech detected, skipping feedback");
            return Ok(PronunciationOutcome::NoSpeechDetected(
                NoSpeechResult::default(),
            ));
        }

        let expected = expected_text.filter(|text| !text.is_empty());
        let transcript = transcription.transcript.as_str();

        let feedback = within(
            self.timeout,
            "pronunciation feedback",
            self.feedback.analyze_pronunciation(
                transcript,
                expected.map(str::to_string),
                language_name(language_code),
            ),
        );
        let local = async {
            let similarity_pct = expected.map_or(100.0, |text| similarity(transcript, text));
            (similarity_pct, analyze_words(&transcription.words))
        };

        let (feedback, (similarity_pct, word_analysis)) = tokio::join!(feedback, local);
        let llm_feedback = feedback?;

        let overall_score = composite_score(transcription.confidence, similarity_pct, &word_analysis);
        let grade = Grade::from_score(overall_score);

        debug!(
            stt_confidence = transcription.confidence,
            similarity = similarity_pct,
            words = word_analysis.len(),
            "Local scoring complete"
        );

        let evaluation = PronunciationEvaluation {
            overall_score,
            stt_confidence_pct: round_to_tenth(transcription.confidence * 100.0),
            similarity_score_pct: round_to_tenth(similarity_pct),
            transcription: transcription.transcript.clone(),
            expected_text: expected_text.unwrap_or_default().to_string(),
            word_analysis,
            pronunciation_feedback: llm_feedback.pronunciation_feedback.clone(),
            suggestions: llm_feedback.suggestions.clone(),
            llm_feedback,
            grade,
        };

        info!(
            overall_score,
            grade = %grade,
            elapsed_ms = start.elapsed().as_millis(),
            "Pronunciation evaluated"
        );

        Ok(PronunciationOutcome::Evaluated(Box::new(evaluation)))
    }

    /// Practice plan for a previous evaluation
    pub fn recommendations(
        &self,
        word_analysis: &[WordAnalysis],
        overall_score: f64,
    ) -> Recommendation {
        recommend(word_analysis, overall_score)
    }
}
