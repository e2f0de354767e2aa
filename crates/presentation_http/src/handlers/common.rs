//! Response envelope and multipart helpers shared by the API handlers

use std::collections::HashMap;

use axum::{Json, extract::Multipart};
use serde::Serialize;

use crate::error::ApiError;

/// Form field carrying the recording
pub const AUDIO_FIELD: &str = "audio";

/// `{"success": true, "data": ...}`
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

/// Wrap `data` in the success envelope
pub fn ok<T>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data,
    })
}

/// Multipart upload with one audio file and optional text fields
#[derive(Debug, Default)]
pub struct AudioForm {
    pub audio: Vec<u8>,
    fields: HashMap<String, String>,
}

impl AudioForm {
    /// Drain a multipart body
    ///
    /// # Errors
    ///
    /// `BadRequest` when the body is malformed or has no `audio` part,
    /// `PayloadTooLarge` when it exceeds the body limit.
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut audio = None;
        let mut fields = HashMap::new();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            if name == AUDIO_FIELD {
                audio = Some(field.bytes().await?.to_vec());
            } else {
                fields.insert(name, field.text().await?);
            }
        }

        let audio =
            audio.ok_or_else(|| ApiError::BadRequest("audio file is required".to_string()))?;
        Ok(Self { audio, fields })
    }

    /// Non-blank text field
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Form field first, then the query string value
    pub fn field_or(&self, name: &str, query: Option<&str>) -> Option<String> {
        self.field(name)
            .or_else(|| query.map(str::trim).filter(|value| !value.is_empty()))
            .map(str::to_string)
    }

    /// Like [`Self::field_or`] but untrimmed; only an empty value is absent
    pub fn text_or(&self, name: &str, query: Option<&str>) -> Option<String> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
            .or_else(|| query.filter(|value| !value.is_empty()))
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_shape() {
        let Json(body) = ok(vec!["km", "lo"]);
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": ["km", "lo"]}));
    }

    #[test]
    fn form_field_wins_over_query() {
        let form = AudioForm {
            audio: vec![1],
            fields: HashMap::from([("language_code".to_string(), "lo-LA".to_string())]),
        };
        assert_eq!(
            form.field_or("language_code", Some("vi-VN")).as_deref(),
            Some("lo-LA")
        );
        assert_eq!(
            form.field_or("scenario", Some(" market ")).as_deref(),
            Some("market")
        );
        assert_eq!(form.field_or("expected_text", None), None);
    }

    #[test]
    fn blank_field_is_absent() {
        let form = AudioForm {
            audio: vec![],
            fields: HashMap::from([("expected_text".to_string(), "  ".to_string())]),
        };
        assert_eq!(form.field("expected_text"), None);
    }

    #[test]
    fn text_field_is_kept_verbatim() {
        let form = AudioForm {
            audio: vec![],
            fields: HashMap::from([
                ("expected_text".to_string(), " hello ".to_string()),
                ("language_code".to_string(), String::new()),
            ]),
        };
        assert_eq!(
            form.text_or("expected_text", Some("bye")).as_deref(),
            Some(" hello ")
        );
        assert_eq!(form.text_or("language_code", Some("  ")).as_deref(), Some("  "));
        assert_eq!(form.text_or("scenario", Some("")), None);
    }
}
