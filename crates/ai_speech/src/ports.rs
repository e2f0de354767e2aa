//! Port definitions for speech processing
//!
//! Defines the traits (ports) that speech processing adapters must implement.

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::types::{
    AudioData, RecognitionOptions, SynthesisInput, Transcription, VoiceInfo, VoiceSelection,
};

/// Port for speech recognition
///
/// # Example
///
/// ```ignore
/// use ai_speech::{AudioData, RecognitionOptions, SpeechToText};
///
/// async fn transcript_of(
///     stt: &impl SpeechToText,
///     audio: AudioData,
/// ) -> Result<String, SpeechError> {
///     let options = RecognitionOptions::new("km-KH");
///     Ok(stt.recognize(audio, &options).await?.text)
/// }
/// ```
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Recognize speech in the audio
    ///
    /// Audio without speech yields [`Transcription::empty`], not an error.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if the request fails or the audio is rejected.
    async fn recognize(
        &self,
        audio: AudioData,
        options: &RecognitionOptions,
    ) -> Result<Transcription, SpeechError>;

    /// Check if the recognition service is reachable
    async fn is_available(&self) -> bool;

    /// Name of the recognition model in use
    fn model_name(&self) -> &str;
}

/// Port for speech synthesis
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize text or SSML with the given voice, returning MP3 audio
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if synthesis fails or no voice matches.
    async fn synthesize(
        &self,
        input: &SynthesisInput,
        voice: &VoiceSelection,
    ) -> Result<AudioData, SpeechError>;

    /// List voices, optionally restricted to one language
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if listing fails.
    async fn list_voices(&self, language_code: Option<&str>) -> Result<Vec<VoiceInfo>, SpeechError>;

    /// Check if the synthesis service is reachable
    async fn is_available(&self) -> bool;
}
