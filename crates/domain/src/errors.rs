//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Confidence value outside of [0, 1]
    #[error("Invalid confidence: {0} (expected a value between 0 and 1)")]
    InvalidConfidence(f64),

    /// Word timing where the end precedes the start
    #[error("Invalid word timing: start {start}s is after end {end}s")]
    InvalidTiming { start: f64, end: f64 },

    /// Language code that has no mapping
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Scenario identifier that does not exist
    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}
