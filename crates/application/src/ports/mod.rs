//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod inference_port;
mod pronunciation_feedback_port;
mod speech_recognition_port;
mod speech_synthesis_port;

#[cfg(test)]
pub use inference_port::MockInferencePort;
pub use inference_port::{InferencePort, InferenceResult};
#[cfg(test)]
pub use pronunciation_feedback_port::MockPronunciationFeedbackPort;
pub use pronunciation_feedback_port::PronunciationFeedbackPort;
#[cfg(test)]
pub use speech_recognition_port::MockSpeechRecognitionPort;
pub use speech_recognition_port::SpeechRecognitionPort;
#[cfg(test)]
pub use speech_synthesis_port::MockSpeechSynthesisPort;
pub use speech_synthesis_port::{
    SpeechSynthesisPort, SynthesisOptions, SynthesisResult, VoiceDescriptor, VoiceGender,
};
