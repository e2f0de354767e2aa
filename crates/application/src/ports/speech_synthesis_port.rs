//! Speech synthesis port - Interface for text-to-speech

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Requested voice gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoiceGender {
    #[default]
    Neutral,
    Male,
    Female,
}

impl VoiceGender {
    /// Case-insensitive parse; anything unrecognized is `Neutral`
    pub fn parse_or_neutral(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "NEUTRAL",
            Self::Male => "MALE",
            Self::Female => "FEMALE",
        }
    }
}

impl FromStr for VoiceGender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NEUTRAL" => Ok(Self::Neutral),
            "MALE" => Ok(Self::Male),
            "FEMALE" => Ok(Self::Female),
            other => Err(format!("unknown voice gender: {other}")),
        }
    }
}

impl fmt::Display for VoiceGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Voice parameters for synthesis
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOptions {
    /// BCP-47 language code, e.g. "km-KH"
    pub language_code: String,
    pub gender: VoiceGender,
    /// 0.25 - 4.0, 1.0 is normal speed
    pub speaking_rate: f32,
    /// Semitones, -20.0 - 20.0
    pub pitch: f32,
}

impl SynthesisOptions {
    pub const MIN_SPEAKING_RATE: f32 = 0.25;
    pub const MAX_SPEAKING_RATE: f32 = 4.0;
    pub const MAX_PITCH: f32 = 20.0;

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

    /// Check rate and pitch bounds
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::InvalidInput` for out-of-range values.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.language_code.trim().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "language_code must not be empty".to_string(),
            ));
        }
        if !(Self::MIN_SPEAKING_RATE..=Self::MAX_SPEAKING_RATE).contains(&self.speaking_rate) {
            return Err(ApplicationError::InvalidInput(format!(
                "speaking_rate must be between {} and {}, got {}",
                Self::MIN_SPEAKING_RATE,
                Self::MAX_SPEAKING_RATE,
                self.speaking_rate
            )));
        }
        if !(-Self::MAX_PITCH..=Self::MAX_PITCH).contains(&self.pitch) {
            return Err(ApplicationError::InvalidInput(format!(
                "pitch must be between -{0} and {0}, got {1}",
                Self::MAX_PITCH,
                self.pitch
            )));
        }
        Ok(())
    }
}

/// Result of a speech synthesis operation
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    /// Generated audio data
    pub audio_data: Vec<u8>,
    /// MIME type of the audio, e.g. "audio/mpeg"
    pub mime_type: String,
    /// Language the audio was actually produced in
    pub language_code: String,
}

/// Information about an available voice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceDescriptor {
    pub name: String,
    pub language_codes: Vec<String>,
    pub gender: VoiceGender,
    #[serde(rename = "natural_sample_rate")]
    pub natural_sample_rate_hertz: u32,
}

/// Port for speech synthesis operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpeechSynthesisPort: Send + Sync {
    /// Synthesize plain text
    async fn synthesize(
        &self,
        text: &str,
        options: &SynthesisOptions,
    ) -> Result<SynthesisResult, ApplicationError>;

    /// Synthesize an SSML document
    async fn synthesize_ssml(
        &self,
        ssml: &str,
        options: &SynthesisOptions,
    ) -> Result<SynthesisResult, ApplicationError>;

    /// List voices, optionally restricted to one language
    async fn list_voices(
        &self,
        language_code: Option<String>,
    ) -> Result<Vec<VoiceDescriptor>, ApplicationError>;

    /// Check if the synthesis backend is reachable
    async fn is_available(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_parsing_is_case_insensitive() {
        assert_eq!(VoiceGender::parse_or_neutral("female"), VoiceGender::Female);
        assert_eq!(VoiceGender::parse_or_neutral(" MALE "), VoiceGender::Male);
        assert_eq!(VoiceGender::parse_or_neutral("robot"), VoiceGender::Neutral);
        assert_eq!(VoiceGender::Female.to_string(), "FEMALE");
    }

    #[test]
    fn default_options_are_valid() {
        let options = SynthesisOptions::new("km-KH");
        assert_eq!(options.gender, VoiceGender::Neutral);
        assert!((options.speaking_rate - 1.0).abs() < f32::EPSILON);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn rate_bounds_are_inclusive() {
        assert!(SynthesisOptions::new("km-KH").with_speaking_rate(0.25).validate().is_ok());
        assert!(SynthesisOptions::new("km-KH").with_speaking_rate(4.0).validate().is_ok());
        assert!(matches!(
            SynthesisOptions::new("km-KH").with_speaking_rate(0.2).validate(),
            Err(ApplicationError::InvalidInput(_))
        ));
        assert!(SynthesisOptions::new("km-KH").with_speaking_rate(4.5).validate().is_err());
    }

    #[test]
    fn pitch_bounds() {
        assert!(SynthesisOptions::new("lo-LA").with_pitch(-20.0).validate().is_ok());
        assert!(SynthesisOptions::new("lo-LA").with_pitch(20.5).validate().is_err());
    }

    #[test]
    fn empty_language_rejected() {
        assert!(SynthesisOptions::new(" ").validate().is_err());
    }
}
