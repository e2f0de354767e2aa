//! Domain entities
//!
//! All entities are immutable value objects passed between layers by value.

mod conversation;
mod evaluation;
mod transcription;
mod tutor;

pub use conversation::{ConversationMessage, MessageRole};
pub use evaluation::{
    NO_SPEECH_FEEDBACK, NoSpeechResult, PronunciationEvaluation, PronunciationOutcome,
    Recommendation, WordAnalysis,
};
pub use transcription::{TranscriptionResult, WordObservation};
pub use tutor::{ConversationEvaluation, ConversationReply, LlmFeedback};
