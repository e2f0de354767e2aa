//! Gemini inference adapter - Implements InferencePort using ai_core

use std::time::Instant;

use ai_core::{
    GeminiInferenceEngine, InferenceConfig, InferenceEngine, InferenceError, InferenceRequest,
    InferenceResponse,
};
use application::{
    error::ApplicationError,
    ports::{InferencePort, InferenceResult},
};
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

/// Adapter for the Gemini generateContent API
#[derive(Debug)]
pub struct GeminiInferenceAdapter {
    engine: GeminiInferenceEngine,
}

impl GeminiInferenceAdapter {
    /// Create a new adapter with the given configuration
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the API key is missing or sampling values
    /// are out of range.
    pub fn new(config: InferenceConfig) -> Result<Self, ApplicationError> {
        let engine = GeminiInferenceEngine::new(config).map_err(Self::map_error)?;
        Ok(Self { engine })
    }

    /// Convert ai_core error to application error
    fn map_error(e: InferenceError) -> ApplicationError {
        match e {
            InferenceError::RateLimited => ApplicationError::RateLimited,
            InferenceError::Configuration(msg) => ApplicationError::Configuration(msg),
            InferenceError::ConnectionFailed(msg) => {
                ApplicationError::Unavailable(format!("Gemini connection failed: {msg}"))
            },
            InferenceError::Authentication(msg) => {
                ApplicationError::Unavailable(format!("Gemini rejected credentials: {msg}"))
            },
            InferenceError::Timeout(ms) => {
                ApplicationError::ExternalService(format!("Inference timeout after {ms}ms"))
            },
            InferenceError::ServerError(msg) => {
                ApplicationError::ExternalService(format!("Gemini server error: {msg}"))
            },
            other @ (InferenceError::RequestFailed(_)
            | InferenceError::ModelNotAvailable(_)
            | InferenceError::InvalidResponse(_)
            | InferenceError::Blocked(_)) => ApplicationError::Inference(other.to_string()),
        }
    }

    async fn run(
        &self,
        request: InferenceRequest,
        start: Instant,
    ) -> Result<InferenceResult, ApplicationError> {
        let response: InferenceResponse = self
            .engine
            .generate(request)
            .await
            .map_err(Self::map_error)?;

        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let tokens_used = response.usage.as_ref().map(|u| u.total_tokens);

        info!(
            latency_ms,
            model = %response.model,
            tokens = ?tokens_used,
            "Gemini inference completed"
        );

        Ok(InferenceResult {
            content: response.content,
            model: response.model,
            tokens_used,
            latency_ms,
        })
    }
}

#[async_trait]
impl InferencePort for GeminiInferenceAdapter {
    #[instrument(skip(self, system_prompt, message), fields(message_len = message.len()))]
    async fn generate_with_system(
        &self,
        system_prompt: &str,
        message: &str,
    ) -> Result<InferenceResult, ApplicationError> {
        let start = Instant::now();
        self.run(InferenceRequest::with_system(system_prompt, message), start)
            .await
    }

    #[instrument(skip(self, system_prompt, message), fields(message_len = message.len()))]
    async fn generate_json(
        &self,
        system_prompt: &str,
        message: &str,
    ) -> Result<InferenceResult, ApplicationError> {
        let start = Instant::now();
        let request = InferenceRequest::with_system(system_prompt, message).expecting_json();
        self.run(request, start).await
    }

    async fn is_healthy(&self) -> bool {
        match self.engine.health_check().await {
            Ok(healthy) => {
                debug!(healthy, "Gemini health check");
                healthy
            },
            Err(e) => {
                warn!(error = %e, "Gemini health check failed");
                false
            },
        }
    }

    fn current_model(&self) -> &str {
        self.engine.default_model()
    }
}
