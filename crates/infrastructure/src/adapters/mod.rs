//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod gemini_inference_adapter;
mod google_speech_adapter;

pub use gemini_inference_adapter::GeminiInferenceAdapter;
pub use google_speech_adapter::GoogleSpeechAdapter;
