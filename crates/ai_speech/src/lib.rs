//! AI Speech - speech recognition and synthesis abstractions
//!
//! Provides traits and implementations for speech processing:
//! - `SpeechToText` - recognize speech with confidence and word timings
//! - `TextToSpeech` - synthesize speech from text or SSML
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains concrete implementations (adapters)
//!
//! # Supported Providers
//!
//! - Google Cloud Speech-to-Text v1 and Text-to-Speech v1 (REST, API key)
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{AudioData, AudioEncoding, GoogleCloudSpeechProvider, RecognitionOptions, SpeechToText};
//!
//! let provider = GoogleCloudSpeechProvider::new(config)?;
//!
//! let audio = AudioData::new(bytes, AudioEncoding::WebmOpus);
//! let options = RecognitionOptions::new("km-KH").with_word_timing(true);
//! let transcription = provider.recognize(audio, &options).await?;
//! println!("{} ({:.2})", transcription.text, transcription.confidence);
//! ```

pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod types;

pub use config::SpeechConfig;
pub use error::SpeechError;
pub use ports::{SpeechToText, TextToSpeech};
pub use providers::google::GoogleCloudSpeechProvider;
pub use types::{
    AudioData, AudioEncoding, RecognitionOptions, SynthesisInput, Transcription, VoiceGender,
    VoiceInfo, VoiceSelection, WordTiming,
};
