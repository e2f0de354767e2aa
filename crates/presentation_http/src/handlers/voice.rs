//! Voice endpoints: transcription, synthesis and pronunciation evaluation

use application::{SynthesisOptions, VoiceDescriptor, VoiceGender};
use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use domain::{PronunciationOutcome, Recommendation, TranscriptionResult, WordAnalysis};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use super::common::{ApiResponse, AudioForm, ok};
use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// Query parameters accepted next to an audio upload
#[derive(Debug, Default, Deserialize)]
pub struct VoiceQuery {
    pub language_code: Option<String>,
    pub expected_text: Option<String>,
}

/// Speech to text with per-word timing
#[instrument(skip(state, query, multipart))]
pub async fn transcribe(
    State(state): State<AppState>,
    Query(query): Query<VoiceQuery>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<TranscriptionResult>>, ApiError> {
    let form = AudioForm::read(multipart).await?;
    let language_code =
        state.language_or_default(form.field_or("language_code", query.language_code.as_deref()));

    let result = state.speech.transcribe(form.audio, &language_code).await?;
    Ok(ok(result))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SynthesizeRequest {
    #[validate(length(min = 1, max = 5000, message = "must be between 1 and 5000 characters"))]
    pub text: String,
    #[serde(default)]
    pub language_code: Option<String>,
    /// NEUTRAL, MALE or FEMALE; anything else is NEUTRAL
    #[serde(default)]
    pub voice_gender: Option<String>,
    #[serde(default = "normal_speaking_rate")]
    pub speaking_rate: f32,
    #[serde(default)]
    pub pitch: f32,
}

const fn normal_speaking_rate() -> f32 {
    1.0
}

/// Text to speech, answered as an MP3 attachment
#[instrument(skip(state, request))]
pub async fn synthesize(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SynthesizeRequest>,
) -> Result<Response, ApiError> {
    let gender = request
        .voice_gender
        .as_deref()
        .map(VoiceGender::parse_or_neutral)
        .unwrap_or_default();
    let options = SynthesisOptions::new(state.language_or_default(request.language_code))
        .with_gender(gender)
        .with_speaking_rate(request.speaking_rate)
        .with_pitch(request.pitch);

    let result = state.speech.synthesize(&request.text, &options).await?;

    let headers = [
        (CONTENT_TYPE, result.mime_type),
        (
            CONTENT_DISPOSITION,
            "attachment; filename=speech.mp3".to_string(),
        ),
    ];
    Ok((headers, result.audio_data).into_response())
}

/// Score a recording, optionally against the sentence the learner read
#[instrument(skip(state, query, multipart))]
pub async fn evaluate_pronunciation(
    State(state): State<AppState>,
    Query(query): Query<VoiceQuery>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<PronunciationOutcome>>, ApiError> {
    let form = AudioForm::read(multipart).await?;
    let language_code =
        state.language_or_default(form.field_or("language_code", query.language_code.as_deref()));
    let expected_text = form.text_or("expected_text", query.expected_text.as_deref());

    let outcome = state
        .pronunciation
        .evaluate(form.audio, expected_text.as_deref(), &language_code)
        .await?;
    Ok(ok(outcome))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub word_analysis: Vec<WordAnalysis>,
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub overall_score: f64,
}

/// Practice plan from a previous evaluation's word analysis
pub async fn recommendations(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RecommendationRequest>,
) -> Json<ApiResponse<Recommendation>> {
    ok(state
        .pronunciation
        .recommendations(&request.word_analysis, request.overall_score))
}

#[derive(Debug, Default, Deserialize)]
pub struct VoicesQuery {
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoiceList {
    pub language_code: String,
    pub voices: Vec<VoiceDescriptor>,
}

#[instrument(skip(state))]
pub async fn list_voices(
    State(state): State<AppState>,
    Query(query): Query<VoicesQuery>,
) -> Result<Json<ApiResponse<VoiceList>>, ApiError> {
    let language_code = state.language_or_default(query.language_code);
    let voices = state.speech.list_voices(&language_code).await?;
    Ok(ok(VoiceList {
        language_code,
        voices,
    }))
}
