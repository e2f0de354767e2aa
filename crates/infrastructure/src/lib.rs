//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on top of the Google speech services and
//! Gemini, and owns configuration loading and log setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, Environment, LearningConfig, LogFormat, LoggingConfig, SecurityConfig,
    ServerConfig,
};
pub use telemetry::{TelemetryError, init_logging};
