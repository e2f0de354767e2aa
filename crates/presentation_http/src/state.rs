//! Application state shared across handlers

use std::sync::Arc;

use application::{ConversationService, PronunciationService, SpeechService};
use infrastructure::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Pronunciation scoring and practice plans
    pub pronunciation: Arc<PronunciationService>,
    /// Typed and spoken conversation turns
    pub conversation: Arc<ConversationService>,
    /// Plain transcription, synthesis and voice listing
    pub speech: Arc<SpeechService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Requested language code, or the configured default
    pub fn language_or_default(&self, requested: Option<String>) -> String {
        requested
            .filter(|code| !code.trim().is_empty())
            .unwrap_or_else(|| self.config.learning.default_language_code.clone())
    }
}
