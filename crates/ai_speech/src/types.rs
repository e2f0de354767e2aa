//! Types for speech processing
//!
//! Contains data structures for audio payloads, recognition results, and voice selection.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Audio encodings understood by the recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioEncoding {
    /// Uncompressed 16-bit little-endian PCM (WAV)
    Linear16,
    /// FLAC lossless
    Flac,
    /// MP3
    Mp3,
    /// Opus in an Ogg container
    OggOpus,
    /// Opus in a WebM container (browser MediaRecorder default)
    WebmOpus,
}

impl AudioEncoding {
    /// Value of the `encoding` field in a recognition config
    #[must_use]
    pub const fn api_name(&self) -> &'static str {
        match self {
            Self::Linear16 => "LINEAR16",
            Self::Flac => "FLAC",
            Self::Mp3 => "MP3",
            Self::OggOpus => "OGG_OPUS",
            Self::WebmOpus => "WEBM_OPUS",
        }
    }

    /// Get the MIME type for this encoding
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Linear16 => "audio/wav",
            Self::Flac => "audio/flac",
            Self::Mp3 => "audio/mpeg",
            Self::OggOpus => "audio/ogg",
            Self::WebmOpus => "audio/webm",
        }
    }

    /// Parse an encoding from a MIME type
    #[must_use]
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        // Handle compound MIME types like "audio/webm;codecs=opus"
        let base_mime = mime.split(';').next().unwrap_or(mime).trim();

        match base_mime {
            "audio/wav" | "audio/x-wav" | "audio/wave" | "audio/l16" => Some(Self::Linear16),
            "audio/flac" | "audio/x-flac" => Some(Self::Flac),
            "audio/mpeg" | "audio/mp3" => Some(Self::Mp3),
            "audio/ogg" | "audio/opus" => Some(Self::OggOpus),
            "audio/webm" | "video/webm" => Some(Self::WebmOpus),
            _ => None,
        }
    }
}

/// Audio payload with optional metadata
#[derive(Debug, Clone)]
pub struct AudioData {
    data: Bytes,
    encoding: AudioEncoding,
    duration_ms: Option<u64>,
    sample_rate: Option<u32>,
}

impl AudioData {
    /// Create new audio data
    #[must_use]
    pub fn new(data: impl Into<Bytes>, encoding: AudioEncoding) -> Self {
        Self {
            data: data.into(),
            encoding,
            duration_ms: None,
            sample_rate: None,
        }
    }

    #[must_use]
    pub const fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    #[must_use]
    pub const fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    #[must_use]
    pub const fn encoding(&self) -> AudioEncoding {
        self.encoding
    }

    #[must_use]
    pub const fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    #[must_use]
    pub const fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        self.encoding.mime_type()
    }
}

/// Per-call recognition settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionOptions {
    /// BCP-47 language code, e.g. "km-KH"
    pub language_code: String,
    /// Request word start/end offsets and per-word confidence
    pub word_timing: bool,
}

impl RecognitionOptions {
    #[must_use]
    pub fn new(language_code: impl Into<String>) -> Self {
        Self {
            language_code: language_code.into(),
            word_timing: false,
        }
    }

    #[must_use]
    pub const fn with_word_timing(mut self, enabled: bool) -> Self {
        self.word_timing = enabled;
        self
    }
}

/// Result of speech recognition
///
/// An empty `text` with zero confidence means no speech was detected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Transcription {
    pub text: String,
    /// Confidence of the best alternative (0.0 - 1.0)
    pub confidence: f64,
    /// Language the recognizer reported, if any
    pub language: Option<String>,
    /// Word-level timings, empty unless requested
    pub words: Vec<WordTiming>,
}

impl Transcription {
    #[must_use]
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence,
            language: None,
            words: Vec::new(),
        }
    }

    /// The result for audio without recognizable speech
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn with_words(mut self, words: Vec<WordTiming>) -> Self {
        self.words = words;
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Word-level timing from recognition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    pub word: String,
    /// Offset from the start of the audio in seconds
    pub start_secs: f64,
    pub end_secs: f64,
    /// Confidence for this word (0.0 - 1.0)
    pub confidence: f64,
}

/// Text to synthesize
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisInput {
    Text(String),
    Ssml(String),
}

impl SynthesisInput {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) | Self::Ssml(text) => text,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

/// Voice gender preference for synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoiceGender {
    #[default]
    Neutral,
    Male,
    Female,
}

impl VoiceGender {
    /// Value of `ssmlGender` in the synthesis API
    #[must_use]
    pub const fn api_name(&self) -> &'static str {
        match self {
            Self::Neutral => "NEUTRAL",
            Self::Male => "MALE",
            Self::Female => "FEMALE",
        }
    }

    /// Parse leniently; unknown values become `Neutral`
    #[must_use]
    pub fn parse_or_neutral(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for VoiceGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl FromStr for VoiceGender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NEUTRAL" => Ok(Self::Neutral),
            "MALE" => Ok(Self::Male),
            "FEMALE" => Ok(Self::Female),
            other => Err(format!("Unknown voice gender: {other}")),
        }
    }
}

/// Voice and audio parameters for synthesis
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSelection {
    pub language_code: String,
    pub gender: VoiceGender,
    /// 0.25 to 4.0, 1.0 is normal speed
    pub speaking_rate: f32,
    /// Semitones, -20.0 to 20.0
    pub pitch: f32,
}

impl VoiceSelection {
    #[must_use]
    pub fn new(language_code: impl Into<String>) -> Self {
        Self {
            language_code: language_code.into(),
            gender: VoiceGender::Neutral,
            speaking_rate: 1.0,
            pitch: 0.0,
        }
    }

    #[must_use]
    pub const fn with_gender(mut self, gender: VoiceGender) -> Self {
        self.gender = gender;
        self
    }

    #[must_use]
    pub const fn with_speaking_rate(mut self, speaking_rate: f32) -> Self {
        self.speaking_rate = speaking_rate;
        self
    }

    #[must_use]
    pub const fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }
}

/// A synthesis voice offered by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub name: String,
    pub language_codes: Vec<String>,
    pub gender: VoiceGender,
    pub natural_sample_rate_hertz: u32,
}
