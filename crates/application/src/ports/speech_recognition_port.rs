//! Speech recognition port - Interface for speech-to-text

use async_trait::async_trait;
use domain::TranscriptionResult;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for speech recognition
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpeechRecognitionPort: Send + Sync {
    /// Transcribe raw audio bytes in the given BCP-47 language
    ///
    /// Audio without recognizable speech yields
    /// `TranscriptionResult::no_speech()`, not an error. Word observations are
    /// only populated when `word_timing` is set.
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        language_code: &str,
        word_timing: bool,
    ) -> Result<TranscriptionResult, ApplicationError>;

    /// Check if the recognition backend is reachable
    async fn is_available(&self) -> bool;
}
