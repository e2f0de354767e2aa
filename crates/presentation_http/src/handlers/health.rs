//! Service info and health handlers

use axum::{Json, extract::State, http::StatusCode};
use domain::Language;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// `GET /` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub status: String,
    pub version: String,
    pub supported_languages: Vec<String>,
}

/// Service name, version and the languages it teaches
pub async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: format!("{} API", state.config.app_name),
        status: "running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        supported_languages: Language::all()
            .iter()
            .map(|language| language.short_code().to_string())
            .collect(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
}

/// Liveness check
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        environment: state.config.environment.to_string(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub speech: bool,
}

/// Readiness check: are the speech backends reachable?
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let speech = state.speech.is_available().await;
    let status = if speech {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(ReadinessResponse {
            ready: speech,
            speech,
        }),
    )
}
