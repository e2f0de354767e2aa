//! Google Gemini inference engine
//!
//! Talks to the Generative Language API (`models/{model}:generateContent`).

mod client;

pub use client::GeminiInferenceEngine;
