//! Conversation practice endpoints

use application::VoiceConversationResult;
use axum::{
    Json,
    extract::{Multipart, Query, State},
};
use domain::{
    ConversationEvaluation, ConversationMessage, ConversationReply, Language, LlmFeedback,
    Scenario,
};
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use super::common::{ApiResponse, AudioForm, ok};
use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

fn default_scenario() -> String {
    Scenario::General.id().to_string()
}

fn default_language() -> String {
    Language::default().name().to_string()
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 2000, message = "must be between 1 and 2000 characters"))]
    pub user_input: String,
    #[serde(default)]
    pub conversation_history: Vec<ConversationMessage>,
    /// Unknown ids fall back to free conversation
    #[serde(default = "default_scenario")]
    pub scenario: String,
    /// Language name, e.g. "Khmer"
    #[serde(default = "default_language")]
    pub language: String,
}

/// Tutor reply to a typed message
#[instrument(skip(state, request))]
pub async fn send_message(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> Result<Json<ApiResponse<ConversationReply>>, ApiError> {
    let reply = state
        .conversation
        .send_message(
            &request.user_input,
            &request.conversation_history,
            Scenario::from_id_or_general(&request.scenario),
            &request.language,
        )
        .await?;
    Ok(ok(reply))
}

#[derive(Debug, Default, Deserialize)]
pub struct VoiceConversationQuery {
    pub scenario: Option<String>,
    pub language_code: Option<String>,
}

/// Spoken turn in, transcript plus spoken reply out
#[instrument(skip(state, query, multipart))]
pub async fn voice_conversation(
    State(state): State<AppState>,
    Query(query): Query<VoiceConversationQuery>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<VoiceConversationResult>>, ApiError> {
    let form = AudioForm::read(multipart).await?;
    let scenario = form
        .field_or("scenario", query.scenario.as_deref())
        .map_or_else(Scenario::default, |id| Scenario::from_id_or_general(&id));
    let language_code =
        state.language_or_default(form.field_or("language_code", query.language_code.as_deref()));

    let result = state
        .conversation
        .voice_conversation(form.audio, scenario, &language_code)
        .await?;
    Ok(ok(result))
}

#[derive(Debug, Deserialize, Validate)]
pub struct EvaluateRequest {
    #[validate(length(min = 1, message = "must contain at least one message"))]
    pub conversation_history: Vec<ConversationMessage>,
    #[serde(default)]
    pub learning_goals: Option<Vec<String>>,
    #[serde(default = "default_language")]
    pub language: String,
}

/// Assessment of a finished session
#[instrument(skip(state, request))]
pub async fn evaluate(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<EvaluateRequest>,
) -> Result<Json<ApiResponse<ConversationEvaluation>>, ApiError> {
    let goals = request.learning_goals.unwrap_or_default();
    let evaluation = state
        .conversation
        .evaluate(&request.conversation_history, &goals, &request.language)
        .await?;
    Ok(ok(evaluation))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeTextRequest {
    #[validate(length(min = 1, max = 2000, message = "must be between 1 and 2000 characters"))]
    pub text: String,
    #[serde(default)]
    pub expected_text: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
}

/// Grammar and naturalness feedback on typed text
#[instrument(skip(state, request))]
pub async fn analyze_text(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AnalyzeTextRequest>,
) -> Result<Json<ApiResponse<LlmFeedback>>, ApiError> {
    let feedback = state
        .conversation
        .analyze_text(
            &request.text,
            request.expected_text.as_deref(),
            &request.language,
        )
        .await?;
    Ok(ok(feedback))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_message_defaults() {
        let request: SendMessageRequest =
            serde_json::from_str(r#"{"user_input": "សួស្តី"}"#).unwrap();
        assert_eq!(request.scenario, "general");
        assert_eq!(request.language, "Khmer");
        assert!(request.conversation_history.is_empty());
    }

    #[test]
    fn history_accepts_ai_role_alias() {
        let request: EvaluateRequest = serde_json::from_str(
            r#"{"conversation_history": [{"role": "user", "content": "hi"}, {"role": "ai", "content": "hello"}]}"#,
        )
        .unwrap();
        assert_eq!(request.conversation_history[1], ConversationMessage::assistant("hello"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn empty_history_fails_validation() {
        let request: EvaluateRequest =
            serde_json::from_str(r#"{"conversation_history": []}"#).unwrap();
        assert!(request.validate().is_err());
    }
}
