//! Validated JSON bodies
//!
//! `ValidatedJson<T>` deserializes like `Json<T>` and then runs the
//! `validator` rules declared on `T`. Failures answer `400` with the same
//! `{error, code}` body as [`crate::error::ApiError`].

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::error::ErrorResponse;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] JsonRejection),
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl ValidationError {
    /// `field: message` pairs, sorted by field for stable output
    fn from_errors(errors: &ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map_or_else(|| error.code.to_string(), ToString::to_string);
                    format!("{field}: {message}")
                })
            })
            .collect();
        messages.sort();
        Self::ValidationFailed(messages.join("; "))
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::JsonError(rejection) => (rejection.status(), rejection.body_text()),
            Self::ValidationFailed(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        let status = if status.is_client_error() {
            status
        } else {
            StatusCode::BAD_REQUEST
        };

        let body = ErrorResponse {
            error,
            code: "validation_error".to_string(),
            details: None,
        };
        (status, Json(body)).into_response()
    }
}

/// `Json<T>` followed by `T::validate`
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value
            .validate()
            .map_err(|errors| ValidationError::from_errors(&errors))?;
        Ok(Self(value))
    }
}
