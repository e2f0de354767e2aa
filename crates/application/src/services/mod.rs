//! Application services - Use case implementations

mod conversation_service;
mod deadline;
mod pronunciation_service;
mod speech_service;
mod tutor_service;

pub use conversation_service::{
    AiResponse, ConversationService, UserInput, VoiceConversationResult,
};
pub use deadline::DEFAULT_BACKEND_TIMEOUT;
pub use pronunciation_service::PronunciationService;
pub use speech_service::{FALLBACK_LANGUAGE_CODE, SpeechService};
pub use tutor_service::TutorService;
