//! Inference errors

use thiserror::Error;

/// Errors that can occur during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Failed to connect to inference server
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to inference server failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Model not found or not enabled for the key
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Response parsing failed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Timeout during inference
    #[error("Inference timeout after {0}ms")]
    Timeout(u64),

    /// Rate limit or quota exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// API key rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Prompt or candidate blocked by safety filters
    #[error("Content blocked: {0}")]
    Blocked(String),

    /// Server error
    #[error("Server error: {0}")]
    ServerError(String),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl InferenceError {
    /// Whether retrying the same request later may succeed
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::Timeout(_) | Self::RateLimited | Self::ServerError(_)
        )
    }
}

impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(30000)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(
            InferenceError::Timeout(5000).to_string(),
            "Inference timeout after 5000ms"
        );
        assert_eq!(
            InferenceError::Blocked("SAFETY".into()).to_string(),
            "Content blocked: SAFETY"
        );
        assert_eq!(InferenceError::RateLimited.to_string(), "Rate limit exceeded");
    }

    #[test]
    fn transient_classification() {
        assert!(InferenceError::RateLimited.is_transient());
        assert!(InferenceError::ServerError("500".into()).is_transient());
        assert!(!InferenceError::Authentication("bad key".into()).is_transient());
        assert!(!InferenceError::Blocked("SAFETY".into()).is_transient());
    }
}
