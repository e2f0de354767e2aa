//! Speech service - direct recognition and synthesis use cases

use std::{fmt, sync::Arc, time::Duration};

use domain::TranscriptionResult;
use tracing::{info, instrument, warn};

use super::deadline::{DEFAULT_BACKEND_TIMEOUT, within};
use crate::{
    error::ApplicationError,
    ports::{
        SpeechRecognitionPort, SpeechSynthesisPort, SynthesisOptions, SynthesisResult,
        VoiceDescriptor, VoiceGender,
    },
};

/// Language used when synthesis in the requested language fails
pub const FALLBACK_LANGUAGE_CODE: &str = "en-US";

/// Service exposing the speech backends to the transport layer
pub struct SpeechService {
    recognizer: Arc<dyn SpeechRecognitionPort>,
    synthesizer: Arc<dyn SpeechSynthesisPort>,
    timeout: Duration,
}

impl fmt::Debug for SpeechService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechService")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl SpeechService {
    /// Create a new speech service
    pub fn new(
        recognizer: Arc<dyn SpeechRecognitionPort>,
        synthesizer: Arc<dyn SpeechSynthesisPort>,
    ) -> Self {
        Self::with_timeout(recognizer, synthesizer, DEFAULT_BACKEND_TIMEOUT)
    }

    /// Create a speech service with a custom backend timeout
    pub fn with_timeout(
        recognizer: Arc<dyn SpeechRecognitionPort>,
        synthesizer: Arc<dyn SpeechSynthesisPort>,
        timeout: Duration,
    ) -> Self {
        Self {
            recognizer,
            synthesizer,
            timeout,
        }
    }

    /// Transcribe audio with word timings
    #[instrument(skip(self, audio), fields(audio_size = audio.len()))]
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        language_code: &str,
    ) -> Result<TranscriptionResult, ApplicationError> {
        if audio.is_empty() {
            return Err(ApplicationError::InvalidInput(
                "Audio data is empty".to_string(),
            ));
        }

        within(
            self.timeout,
            "speech recognition",
            self.recognizer.transcribe(audio, language_code, true),
        )
        .await
    }

    /// Synthesize text, retrying once in English with a neutral voice
    ///
    /// # Errors
    ///
    /// Blank text and out-of-range voice parameters are `InvalidInput`. When
    /// the English retry fails too, its error is returned.
    #[instrument(skip(self, text), fields(text_len = text.len(), language = %options.language_code))]
    pub async fn synthesize(
        &self,
        text: &str,
        options: &SynthesisOptions,
    ) -> Result<SynthesisResult, ApplicationError> {
        if text.trim().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "text must not be empty".to_string(),
            ));
        }
        options.validate()?;

        let primary = within(
            self.timeout,
            "speech synthesis",
            self.synthesizer.synthesize(text, options),
        )
        .await;

        match primary {
            Ok(result) => Ok(result),
            Err(e) if e.is_client_error() || options.language_code == FALLBACK_LANGUAGE_CODE => {
                Err(e)
            },
            Err(e) => {
                warn!(
                    error = %e,
                    language = %options.language_code,
                    "Synthesis failed, falling back to {}", FALLBACK_LANGUAGE_CODE
                );
                let fallback = SynthesisOptions {
                    language_code: FALLBACK_LANGUAGE_CODE.to_string(),
                    gender: VoiceGender::Neutral,
                    ..options.clone()
                };
                let result = within(
                    self.timeout,
                    "speech synthesis",
                    self.synthesizer.synthesize(text, &fallback),
                )
                .await?;
                info!("Synthesized speech with fallback voice");
                Ok(result)
            },
        }
    }

    /// Synthesize an SSML document with a neutral voice
    #[instrument(skip(self, ssml), fields(ssml_len = ssml.len()))]
    pub async fn synthesize_ssml(
        &self,
        ssml: &str,
        language_code: &str,
    ) -> Result<SynthesisResult, ApplicationError> {
        if ssml.trim().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "ssml must not be empty".to_string(),
            ));
        }
        let options = SynthesisOptions::new(language_code);
        options.validate()?;

        within(
            self.timeout,
            "speech synthesis",
            self.synthesizer.synthesize_ssml(ssml, &options),
        )
        .await
    }

    /// Voices available for a language
    #[instrument(skip(self))]
    pub async fn list_voices(
        &self,
        language_code: &str,
    ) -> Result<Vec<VoiceDescriptor>, ApplicationError> {
        within(
            self.timeout,
            "voice listing",
            self.synthesizer.list_voices(Some(language_code.to_string())),
        )
        .await
    }

    /// Whether both speech backends answer
    pub async fn is_available(&self) -> bool {
        let (recognition, synthesis) =
            tokio::join!(self.recognizer.is_available(), self.synthesizer.is_available());
        recognition && synthesis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{MockSpeechRecognitionPort, MockSpeechSynthesisPort};
    use mockall::Sequence;
    use mockall::predicate::*;

    fn mp3(language_code: &str) -> SynthesisResult {
        SynthesisResult {
            audio_data: vec![0xFF, 0xFB],
            mime_type: "audio/mpeg".to_string(),
            language_code: language_code.to_string(),
        }
    }

    fn service_with_synth(synth: MockSpeechSynthesisPort) -> SpeechService {
        SpeechService::new(Arc::new(MockSpeechRecognitionPort::new()), Arc::new(synth))
    }

    #[tokio::test]
    async fn transcribe_requests_word_timing() {
        let mut recognizer = MockSpeechRecognitionPort::new();
        recognizer
            .expect_transcribe()
            .with(always(), eq("vi-VN"), eq(true))
            .times(1)
            .returning(|_, _, _| Ok(TranscriptionResult::new("xin chào", 0.92)));

        let service = SpeechService::new(
            Arc::new(recognizer),
            Arc::new(MockSpeechSynthesisPort::new()),
        );

        let result = service.transcribe(vec![1, 2], "vi-VN").await.unwrap();
        assert_eq!(result.transcript, "xin chào");
    }

    #[tokio::test]
    async fn transcribe_rejects_empty_audio() {
        let service = SpeechService::new(
            Arc::new(MockSpeechRecognitionPort::new()),
            Arc::new(MockSpeechSynthesisPort::new()),
        );
        let result = service.transcribe(Vec::new(), "km-KH").await;
        assert!(matches!(result, Err(ApplicationError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn synthesize_success_uses_requested_voice() {
        let mut synth = MockSpeechSynthesisPort::new();
        synth
            .expect_synthesize()
            .withf(|text, options| {
                text == "ជំរាបសួរ"
                    && options.language_code == "km-KH"
                    && options.gender == VoiceGender::Female
            })
            .times(1)
            .returning(|_, options| Ok(mp3(&options.language_code)));

        let options = SynthesisOptions::new("km-KH").with_gender(VoiceGender::Female);
        let result = service_with_synth(synth)
            .synthesize("ជំរាបសួរ", &options)
            .await
            .unwrap();

        assert_eq!(result.language_code, "km-KH");
        assert_eq!(result.mime_type, "audio/mpeg");
    }

    #[tokio::test]
    async fn synthesize_falls_back_to_english_neutral() {
        let mut seq = Sequence::new();
        let mut synth = MockSpeechSynthesisPort::new();
        synth
            .expect_synthesize()
            .withf(|_, options| options.language_code == "km-KH")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(ApplicationError::ExternalService("voice not found".into())));
        synth
            .expect_synthesize()
            .withf(|_, options| {
                options.language_code == "en-US"
                    && options.gender == VoiceGender::Neutral
                    && (options.speaking_rate - 0.8).abs() < f32::EPSILON
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, options| Ok(mp3(&options.language_code)));

        let options = SynthesisOptions::new("km-KH")
            .with_gender(VoiceGender::Male)
            .with_speaking_rate(0.8);
        let result = service_with_synth(synth)
            .synthesize("hello", &options)
            .await
            .unwrap();

        assert_eq!(result.language_code, "en-US");
    }

    #[tokio::test]
    async fn synthesize_propagates_when_fallback_fails() {
        let mut synth = MockSpeechSynthesisPort::new();
        synth
            .expect_synthesize()
            .times(2)
            .returning(|_, _| Err(ApplicationError::ExternalService("tts down".into())));

        let result = service_with_synth(synth)
            .synthesize("hello", &SynthesisOptions::new("lo-LA"))
            .await;

        assert!(matches!(result, Err(ApplicationError::ExternalService(_))));
    }

    #[tokio::test]
    async fn english_failure_is_not_retried() {
        let mut synth = MockSpeechSynthesisPort::new();
        synth
            .expect_synthesize()
            .times(1)
            .returning(|_, _| Err(ApplicationError::RateLimited));

        let result = service_with_synth(synth)
            .synthesize("hello", &SynthesisOptions::new("en-US"))
            .await;

        assert!(matches!(result, Err(ApplicationError::RateLimited)));
    }

    #[tokio::test]
    async fn synthesize_validates_before_calling_backend() {
        let mut synth = MockSpeechSynthesisPort::new();
        synth.expect_synthesize().never();
        let service = service_with_synth(synth);

        let too_fast = SynthesisOptions::new("km-KH").with_speaking_rate(5.0);
        assert!(matches!(
            service.synthesize("hello", &too_fast).await,
            Err(ApplicationError::InvalidInput(_))
        ));
        assert!(matches!(
            service.synthesize("   ", &SynthesisOptions::new("km-KH")).await,
            Err(ApplicationError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn synthesize_ssml_uses_neutral_voice() {
        let mut synth = MockSpeechSynthesisPort::new();
        synth
            .expect_synthesize_ssml()
            .withf(|ssml, options| {
                ssml.starts_with("<speak>")
                    && options.language_code == "km-KH"
                    && options.gender == VoiceGender::Neutral
            })
            .times(1)
            .returning(|_, options| Ok(mp3(&options.language_code)));

        let result = service_with_synth(synth)
            .synthesize_ssml("<speak>ជំរាបសួរ</speak>", "km-KH")
            .await
            .unwrap();
        assert_eq!(result.audio_data, vec![0xFF, 0xFB]);
    }

    #[tokio::test]
    async fn list_voices_passes_language() {
        let mut synth = MockSpeechSynthesisPort::new();
        synth
            .expect_list_voices()
            .with(eq(Some("km-KH".to_string())))
            .times(1)
            .returning(|_| {
                Ok(vec![VoiceDescriptor {
                    name: "km-KH-Standard-A".to_string(),
                    language_codes: vec!["km-KH".to_string()],
                    gender: VoiceGender::Female,
                    natural_sample_rate_hertz: 24000,
                }])
            });

        let voices = service_with_synth(synth).list_voices("km-KH").await.unwrap();
        assert_eq!(voices.len(), 1);
        assert_eq!(voices[0].name, "km-KH-Standard-A");
    }

    #[tokio::test]
    async fn availability_requires_both_backends() {
        let mut recognizer = MockSpeechRecognitionPort::new();
        recognizer.expect_is_available().returning(|| true);
        let mut synth = MockSpeechSynthesisPort::new();
        synth.expect_is_available().returning(|| false);

        let service = SpeechService::new(Arc::new(recognizer), Arc::new(synth));
        assert!(!service.is_available().await);
    }
}
