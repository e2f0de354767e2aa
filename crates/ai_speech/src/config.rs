//! Configuration for speech processing

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::AudioEncoding;

/// Configuration for the Google Cloud speech services
#[derive(Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Google Cloud API key (sensitive)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Speech-to-Text API base URL
    #[serde(default = "default_stt_base_url")]
    pub stt_base_url: String,

    /// Text-to-Speech API base URL
    #[serde(default = "default_tts_base_url")]
    pub tts_base_url: String,

    /// Recognition model ("default", "latest_short", "latest_long", ...)
    #[serde(default = "default_stt_model")]
    pub stt_model: String,

    /// Encoding assumed for uploaded audio when the caller does not know it
    #[serde(default = "default_input_encoding")]
    pub input_encoding: AudioEncoding,

    /// Sample rate sent with the recognition config, if fixed
    #[serde(default)]
    pub sample_rate_hertz: Option<u32>,

    /// Ask the recognizer to insert punctuation
    #[serde(default = "default_true")]
    pub enable_automatic_punctuation: bool,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum audio duration in milliseconds
    #[serde(default = "default_max_audio_duration_ms")]
    pub max_audio_duration_ms: u64,

    /// Device profiles applied to synthesized audio
    #[serde(default = "default_effects_profile")]
    pub effects_profile_id: Vec<String>,
}

fn default_stt_base_url() -> String {
    "https://speech.googleapis.com/v1".to_string()
}

fn default_tts_base_url() -> String {
    "https://texttospeech.googleapis.com/v1".to_string()
}

fn default_stt_model() -> String {
    "default".to_string()
}

const fn default_input_encoding() -> AudioEncoding {
    AudioEncoding::WebmOpus
}

const fn default_true() -> bool {
    true
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

const fn default_max_audio_duration_ms() -> u64 {
    30000 // 30 seconds
}

fn default_effects_profile() -> Vec<String> {
    vec!["handset-class-device".to_string()]
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            stt_base_url: default_stt_base_url(),
            tts_base_url: default_tts_base_url(),
            stt_model: default_stt_model(),
            input_encoding: default_input_encoding(),
            sample_rate_hertz: None,
            enable_automatic_punctuation: default_true(),
            timeout_ms: default_timeout_ms(),
            max_audio_duration_ms: default_max_audio_duration_ms(),
            effects_profile_id: default_effects_profile(),
        }
    }
}

impl fmt::Debug for SpeechConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechConfig")
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("stt_base_url", &self.stt_base_url)
            .field("tts_base_url", &self.tts_base_url)
            .field("stt_model", &self.stt_model)
            .field("input_encoding", &self.input_encoding)
            .field("sample_rate_hertz", &self.sample_rate_hertz)
            .field(
                "enable_automatic_punctuation",
                &self.enable_automatic_punctuation,
            )
            .field("timeout_ms", &self.timeout_ms)
            .field("max_audio_duration_ms", &self.max_audio_duration_ms)
            .field("effects_profile_id", &self.effects_profile_id)
            .finish()
    }
}

impl SpeechConfig {
    /// Create a minimal config for testing
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            api_key: Some(SecretString::from("test-key")),
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.is_none() {
            return Err("Google Cloud API key is required for speech services".to_string());
        }

        if self.stt_base_url.is_empty() || self.tts_base_url.is_empty() {
            return Err("Speech API base URLs must not be empty".to_string());
        }

        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        if self.max_audio_duration_ms == 0 {
            return Err("Max audio duration must be greater than 0".to_string());
        }

        if let Some(rate) = self.sample_rate_hertz {
            if !(8000..=48000).contains(&rate) {
                return Err(format!(
                    "Sample rate must be between 8000 and 48000 Hz, got {rate}"
                ));
            }
        }

        Ok(())
    }
}
