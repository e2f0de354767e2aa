//! Speech adapter - Implements the speech ports using the Google provider

use std::sync::Arc;

use ai_speech::{
    AudioData, AudioEncoding, GoogleCloudSpeechProvider, RecognitionOptions, SpeechConfig,
    SpeechError, SpeechToText, SynthesisInput, TextToSpeech, Transcription, VoiceGender,
    VoiceInfo, VoiceSelection, WordTiming,
};
use application::error::ApplicationError;
use application::ports::{
    SpeechRecognitionPort, SpeechSynthesisPort, SynthesisOptions, SynthesisResult,
    VoiceDescriptor, VoiceGender as PortVoiceGender,
};
use async_trait::async_trait;
use domain::{TranscriptionResult, WordObservation};
use tracing::{debug, instrument, warn};

/// Adapter for Google Cloud Speech-to-Text and Text-to-Speech
pub struct GoogleSpeechAdapter {
    provider: Arc<GoogleCloudSpeechProvider>,
    input_encoding: AudioEncoding,
}

impl std::fmt::Debug for GoogleSpeechAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSpeechAdapter")
            .field("provider", &"GoogleCloudSpeechProvider")
            .field("input_encoding", &self.input_encoding)
            .finish()
    }
}

impl GoogleSpeechAdapter {
    /// Create a new speech adapter
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the API key is missing or the config is
    /// otherwise invalid.
    pub fn new(config: SpeechConfig) -> Result<Self, ApplicationError> {
        let input_encoding = config.input_encoding;
        let provider = GoogleCloudSpeechProvider::new(config).map_err(Self::map_error)?;

        Ok(Self {
            provider: Arc::new(provider),
            input_encoding,
        })
    }

    /// Map speech error to application error
    fn map_error(err: SpeechError) -> ApplicationError {
        match err {
            SpeechError::Configuration(e) => ApplicationError::Configuration(e),
            SpeechError::Authentication(e) => {
                ApplicationError::Unavailable(format!("Speech service rejected credentials: {e}"))
            },
            SpeechError::ConnectionFailed(e) | SpeechError::ServiceUnavailable(e) => {
                ApplicationError::Unavailable(format!("Speech service unavailable: {e}"))
            },
            SpeechError::RequestFailed(e) => ApplicationError::ExternalService(e),
            SpeechError::InvalidAudio(e) => {
                ApplicationError::InvalidInput(format!("Invalid audio: {e}"))
            },
            SpeechError::AudioTooLong {
                duration_ms,
                max_ms,
            } => ApplicationError::InvalidInput(format!(
                "Audio too long: {duration_ms}ms exceeds max {max_ms}ms"
            )),
            SpeechError::TranscriptionFailed(e) => {
                ApplicationError::ExternalService(format!("Transcription failed: {e}"))
            },
            SpeechError::SynthesisFailed(e) => {
                ApplicationError::ExternalService(format!("Synthesis failed: {e}"))
            },
            SpeechError::VoiceNotFound(v) => {
                ApplicationError::ExternalService(format!("Voice not found: {v}"))
            },
            SpeechError::InvalidResponse(e) => {
                ApplicationError::ExternalService(format!("Invalid speech response: {e}"))
            },
            SpeechError::Timeout(ms) => {
                ApplicationError::ExternalService(format!("Speech service timeout after {ms}ms"))
            },
            SpeechError::RateLimited => ApplicationError::RateLimited,
        }
    }

    fn voice_selection(options: &SynthesisOptions) -> VoiceSelection {
        VoiceSelection::new(&options.language_code)
            .with_gender(to_provider_gender(options.gender))
            .with_speaking_rate(options.speaking_rate)
            .with_pitch(options.pitch)
    }

    async fn synthesize_input(
        &self,
        input: SynthesisInput,
        options: &SynthesisOptions,
    ) -> Result<SynthesisResult, ApplicationError> {
        let audio = self
            .provider
            .synthesize(&input, &Self::voice_selection(options))
            .await
            .map_err(Self::map_error)?;

        debug!(audio_bytes = audio.size_bytes(), "Synthesis complete");

        Ok(SynthesisResult {
            mime_type: audio.mime_type().to_string(),
            audio_data: audio.into_bytes().to_vec(),
            language_code: options.language_code.clone(),
        })
    }
}

const fn to_provider_gender(gender: PortVoiceGender) -> VoiceGender {
    match gender {
        PortVoiceGender::Neutral => VoiceGender::Neutral,
        PortVoiceGender::Male => VoiceGender::Male,
        PortVoiceGender::Female => VoiceGender::Female,
    }
}

const fn to_port_gender(gender: VoiceGender) -> PortVoiceGender {
    match gender {
        VoiceGender::Neutral => PortVoiceGender::Neutral,
        VoiceGender::Male => PortVoiceGender::Male,
        VoiceGender::Female => PortVoiceGender::Female,
    }
}

/// Domain transcription from the provider result
///
/// Every recognized word is kept. Confidences are clamped into [0, 1] and
/// reversed start/end offsets are swapped; only a word with a non-numeric
/// confidence is dropped, with a warning.
fn to_transcription_result(transcription: Transcription) -> TranscriptionResult {
    if transcription.is_empty() {
        return TranscriptionResult::no_speech();
    }

    let words = transcription
        .words
        .into_iter()
        .filter_map(|word: WordTiming| {
            let start = word.start_secs.min(word.end_secs);
            let end = word.start_secs.max(word.end_secs);
            WordObservation::new(word.word, word.confidence.clamp(0.0, 1.0), start, end)
                .map_err(|e| warn!(error = %e, "Dropping word with invalid confidence"))
                .ok()
        })
        .collect();

    TranscriptionResult::new(transcription.text, transcription.confidence).with_words(words)
}

fn to_voice_descriptor(voice: VoiceInfo) -> VoiceDescriptor {
    VoiceDescriptor {
        name: voice.name,
        language_codes: voice.language_codes,
        gender: to_port_gender(voice.gender),
        natural_sample_rate_hertz: voice.natural_sample_rate_hertz,
    }
}

#[async_trait]
impl SpeechRecognitionPort for GoogleSpeechAdapter {
    #[instrument(skip(self, audio), fields(audio_size = audio.len(), language = %language_code))]
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        language_code: &str,
        word_timing: bool,
    ) -> Result<TranscriptionResult, ApplicationError> {
        let audio = AudioData::new(audio, self.input_encoding);
        let options = RecognitionOptions::new(language_code).with_word_timing(word_timing);

        let transcription = self
            .provider
            .recognize(audio, &options)
            .await
            .map_err(Self::map_error)?;

        debug!(
            text_len = transcription.text.len(),
            confidence = transcription.confidence,
            words = transcription.words.len(),
            "Transcription complete"
        );

        Ok(to_transcription_result(transcription))
    }

    async fn is_available(&self) -> bool {
        SpeechToText::is_available(self.provider.as_ref()).await
    }
}

#[async_trait]
impl SpeechSynthesisPort for GoogleSpeechAdapter {
    #[instrument(skip(self, text), fields(text_len = text.len(), language = %options.language_code))]
    async fn synthesize(
        &self,
        text: &str,
        options: &SynthesisOptions,
    ) -> Result<SynthesisResult, ApplicationError> {
        self.synthesize_input(SynthesisInput::Text(text.to_string()), options)
            .await
    }

    #[instrument(skip(self, ssml), fields(ssml_len = ssml.len(), language = %options.language_code))]
    async fn synthesize_ssml(
        &self,
        ssml: &str,
        options: &SynthesisOptions,
    ) -> Result<SynthesisResult, ApplicationError> {
        self.synthesize_input(SynthesisInput::Ssml(ssml.to_string()), options)
            .await
    }

    async fn list_voices(
        &self,
        language_code: Option<String>,
    ) -> Result<Vec<VoiceDescriptor>, ApplicationError> {
        let voices = self
            .provider
            .list_voices(language_code.as_deref())
            .await
            .map_err(Self::map_error)?;

        Ok(voices.into_iter().map(to_voice_descriptor).collect())
    }

    async fn is_available(&self) -> bool {
        TextToSpeech::is_available(self.provider.as_ref()).await
    }
}
