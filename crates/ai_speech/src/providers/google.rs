//! Google Cloud speech provider
//!
//! Implements `SpeechToText` with Speech-to-Text v1 (`speech:recognize`) and
//! `TextToSpeech` with Text-to-Speech v1 (`text:synthesize`, `voices`).
//! Both are plain REST calls authenticated with an API key query parameter.
//!
//! # Audio
//!
//! - Recognition accepts LINEAR16, FLAC, MP3, OGG_OPUS and WEBM_OPUS content,
//!   sent inline as base64
//! - Synthesis always returns MP3

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::{Client, Response};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::ports::{SpeechToText, TextToSpeech};
use crate::types::{
    AudioData, AudioEncoding, RecognitionOptions, SynthesisInput, Transcription, VoiceGender,
    VoiceInfo, VoiceSelection, WordTiming,
};

/// Synthesis input limit of the Text-to-Speech API, in bytes
const MAX_SYNTHESIS_INPUT_BYTES: usize = 5000;

/// Google Cloud provider implementing both recognition and synthesis
#[derive(Debug, Clone)]
pub struct GoogleCloudSpeechProvider {
    client: Client,
    config: SpeechConfig,
}

impl GoogleCloudSpeechProvider {
    /// Create a new provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid,
    /// including a missing API key.
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    fn api_key(&self) -> &str {
        self.config
            .api_key
            .as_ref()
            .map_or("", |key| key.expose_secret())
    }

    fn recognize_url(&self) -> String {
        format!(
            "{}/speech:recognize",
            self.config.stt_base_url.trim_end_matches('/')
        )
    }

    fn synthesize_url(&self) -> String {
        format!(
            "{}/text:synthesize",
            self.config.tts_base_url.trim_end_matches('/')
        )
    }

    fn voices_url(&self) -> String {
        format!("{}/voices", self.config.tts_base_url.trim_end_matches('/'))
    }

    /// Cheap authenticated call used for availability checks
    async fn probe(&self) -> bool {
        match self
            .client
            .get(self.voices_url())
            .query(&[("key", self.api_key()), ("languageCode", "en-US")])
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Google Cloud speech availability check failed: {}", e);
                false
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    encoding: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample_rate_hertz: Option<u32>,
    language_code: &'a str,
    enable_word_time_offsets: bool,
    enable_word_confidence: bool,
    enable_automatic_punctuation: bool,
    model: &'a str,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<RecognitionAlternative>,
}

#[derive(Debug, Deserialize)]
struct RecognitionAlternative {
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    words: Vec<WordInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WordInfo {
    #[serde(default)]
    word: String,
    start_time: Option<String>,
    end_time: Option<String>,
    confidence: Option<f64>,
}

impl RecognizeResponse {
    /// Best alternative of the first result; empty when nothing was heard
    fn into_transcription(self, options: &RecognitionOptions) -> Transcription {
        let Some(best) = self
            .results
            .into_iter()
            .next()
            .and_then(|result| result.alternatives.into_iter().next())
        else {
            return Transcription::empty();
        };

        let alternative_confidence = best.confidence;
        let words = if options.word_timing {
            best.words
                .into_iter()
                .map(|info| WordTiming {
                    word: info.word,
                    start_secs: parse_duration(info.start_time.as_deref()),
                    end_secs: parse_duration(info.end_time.as_deref()),
                    confidence: info.confidence.unwrap_or(alternative_confidence),
                })
                .collect()
        } else {
            Vec::new()
        };

        Transcription::new(best.transcript, alternative_confidence)
            .with_language(options.language_code.clone())
            .with_words(words)
    }
}

/// Parse a protobuf JSON duration such as `"1.500s"` into seconds
fn parse_duration(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().strip_suffix('s'))
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInputBody<'a>,
    voice: VoiceSelectionParams<'a>,
    audio_config: AudioConfigBody<'a>,
}

/// Serializes as `{"text": ...}` or `{"ssml": ...}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum SynthesisInputBody<'a> {
    Text(&'a str),
    Ssml(&'a str),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelectionParams<'a> {
    language_code: &'a str,
    ssml_gender: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfigBody<'a> {
    audio_encoding: &'static str,
    speaking_rate: f32,
    pitch: f32,
    effects_profile_id: &'a [String],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

#[derive(Debug, Deserialize)]
struct VoicesResponse {
    #[serde(default)]
    voices: Vec<GoogleVoice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleVoice {
    #[serde(default)]
    language_codes: Vec<String>,
    name: String,
    #[serde(default)]
    ssml_gender: String,
    #[serde(default)]
    natural_sample_rate_hertz: u32,
}

impl From<GoogleVoice> for VoiceInfo {
    fn from(voice: GoogleVoice) -> Self {
        Self {
            name: voice.name,
            language_codes: voice.language_codes,
            gender: VoiceGender::parse_or_neutral(&voice.ssml_gender),
            natural_sample_rate_hertz: voice.natural_sample_rate_hertz,
        }
    }
}

/// Google API error envelope
#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Map a non-success response to a `SpeechError`
///
/// `failed` builds the operation-specific error for anything not covered by
/// the shared status mapping.
async fn api_error(response: Response, failed: fn(String) -> SpeechError) -> SpeechError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let detail = serde_json::from_str::<GoogleErrorBody>(&body)
        .ok()
        .map(|envelope| envelope.error);
    let message = detail
        .as_ref()
        .map_or_else(|| format!("HTTP {status}: {body}"), |d| d.message.clone());
    let google_status = detail.as_ref().map_or("", |d| d.status.as_str());

    match (status.as_u16(), google_status) {
        (429, _) | (_, "RESOURCE_EXHAUSTED") => SpeechError::RateLimited,
        (401 | 403, _) | (_, "UNAUTHENTICATED" | "PERMISSION_DENIED") => {
            SpeechError::Authentication(message)
        },
        (503, _) | (_, "UNAVAILABLE") => SpeechError::ServiceUnavailable(message),
        _ => failed(message),
    }
}

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

#[async_trait]
impl SpeechToText for GoogleCloudSpeechProvider {
    #[instrument(skip(self, audio), fields(audio_size = audio.size_bytes(), encoding = ?audio.encoding(), language = %options.language_code))]
    async fn recognize(
        &self,
        audio: AudioData,
        options: &RecognitionOptions,
    ) -> Result<Transcription, SpeechError> {
        debug!("Recognizing speech with Google Cloud Speech-to-Text");

        if let Some(duration_ms) = audio.duration_ms() {
            if duration_ms > self.config.max_audio_duration_ms {
                return Err(SpeechError::AudioTooLong {
                    duration_ms,
                    max_ms: self.config.max_audio_duration_ms,
                });
            }
        }

        if audio.is_empty() {
            return Err(SpeechError::InvalidAudio("Audio data is empty".to_string()));
        }

        let request = RecognizeRequest {
            config: RecognitionConfig {
                encoding: audio.encoding().api_name(),
                sample_rate_hertz: audio.sample_rate().or(self.config.sample_rate_hertz),
                language_code: &options.language_code,
                enable_word_time_offsets: options.word_timing,
                enable_word_confidence: options.word_timing,
                enable_automatic_punctuation: self.config.enable_automatic_punctuation,
                model: &self.config.stt_model,
            },
            audio: RecognitionAudio {
                content: BASE64.encode(audio.data()),
            },
        };

        let response = self
            .client
            .post(self.recognize_url())
            .query(&[("key", self.api_key())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response, SpeechError::TranscriptionFailed).await);
        }

        let body: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let transcription = body.into_transcription(options);

        debug!(
            text_len = transcription.text.len(),
            confidence = transcription.confidence,
            words = transcription.words.len(),
            "Recognition complete"
        );

        Ok(transcription)
    }

    async fn is_available(&self) -> bool {
        self.probe().await
    }

    fn model_name(&self) -> &str {
        &self.config.stt_model
    }
}

#[async_trait]
impl TextToSpeech for GoogleCloudSpeechProvider {
    #[instrument(skip(self, input), fields(input_len = input.as_str().len(), language = %voice.language_code, gender = %voice.gender))]
    async fn synthesize(
        &self,
        input: &SynthesisInput,
        voice: &VoiceSelection,
    ) -> Result<AudioData, SpeechError> {
        debug!("Synthesizing speech with Google Cloud Text-to-Speech");

        if input.is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Text cannot be empty".to_string(),
            ));
        }

        if input.as_str().len() > MAX_SYNTHESIS_INPUT_BYTES {
            return Err(SpeechError::SynthesisFailed(format!(
                "Text too long: {} bytes exceeds {MAX_SYNTHESIS_INPUT_BYTES} limit",
                input.as_str().len()
            )));
        }

        let request = SynthesizeRequest {
            input: match input {
                SynthesisInput::Text(text) => SynthesisInputBody::Text(text),
                SynthesisInput::Ssml(ssml) => SynthesisInputBody::Ssml(ssml),
            },
            voice: VoiceSelectionParams {
                language_code: &voice.language_code,
                ssml_gender: voice.gender.api_name(),
            },
            audio_config: AudioConfigBody {
                audio_encoding: "MP3",
                speaking_rate: voice.speaking_rate,
                pitch: voice.pitch,
                effects_profile_id: &self.config.effects_profile_id,
            },
        };

        let response = self
            .client
            .post(self.synthesize_url())
            .query(&[("key", self.api_key())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response, SpeechError::SynthesisFailed).await);
        }

        let body: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let audio = BASE64
            .decode(body.audio_content.as_bytes())
            .map_err(|e| SpeechError::InvalidResponse(format!("Invalid audio content: {e}")))?;

        debug!(audio_size = audio.len(), "Speech synthesis complete");

        Ok(AudioData::new(audio, AudioEncoding::Mp3))
    }

    #[instrument(skip(self))]
    async fn list_voices(&self, language_code: Option<&str>) -> Result<Vec<VoiceInfo>, SpeechError> {
        let mut request = self
            .client
            .get(self.voices_url())
            .query(&[("key", self.api_key())]);
        if let Some(code) = language_code {
            request = request.query(&[("languageCode", code)]);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(api_error(response, SpeechError::RequestFailed).await);
        }

        let body: VoicesResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        debug!(count = body.voices.len(), "Listed voices");

        Ok(body.voices.into_iter().map(VoiceInfo::from).collect())
    }

    async fn is_available(&self) -> bool {
        self.probe().await
    }
}
