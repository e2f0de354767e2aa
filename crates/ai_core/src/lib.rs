//! AI Core - Inference engine abstractions
//!
//! Provides the `InferenceEngine` port and a Google Gemini implementation
//! that talks to the Generative Language REST API.

pub mod config;
pub mod error;
pub mod gemini;
pub mod ports;

pub use config::InferenceConfig;
pub use error::InferenceError;
pub use gemini::GeminiInferenceEngine;
pub use ports::{
    InferenceEngine, InferenceMessage, InferenceRequest, InferenceResponse, InferenceRole,
    TokenUsage,
};
