//! Route definitions

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{handlers, middleware::propagate_request_id, state::AppState};

/// Create the main router with all routes
///
/// Audio uploads and JSON bodies get separate size limits from
/// `server.max_body_size_*`. CORS and rate limiting are layered on by the
/// binary.
pub fn create_router(state: AppState) -> Router {
    let audio_limit = state.config.server.max_body_size_audio_bytes;
    let json_limit = state.config.server.max_body_size_json_bytes;

    let voice = Router::new()
        .route("/transcribe", post(handlers::voice::transcribe))
        .route(
            "/evaluate-pronunciation",
            post(handlers::voice::evaluate_pronunciation),
        )
        .layer(DefaultBodyLimit::max(audio_limit))
        .merge(
            Router::new()
                .route("/synthesize", post(handlers::voice::synthesize))
                .route("/recommendations", post(handlers::voice::recommendations))
                .route("/voices", get(handlers::voice::list_voices))
                .layer(DefaultBodyLimit::max(json_limit)),
        );

    let conversation = Router::new()
        .route(
            "/voice-conversation",
            post(handlers::conversation::voice_conversation),
        )
        .layer(DefaultBodyLimit::max(audio_limit))
        .merge(
            Router::new()
                .route("/send-message", post(handlers::conversation::send_message))
                .route("/evaluate", post(handlers::conversation::evaluate))
                .route("/analyze-text", post(handlers::conversation::analyze_text))
                .layer(DefaultBodyLimit::max(json_limit)),
        );

    let scenarios = Router::new()
        .route("/", get(handlers::scenarios::list_scenarios))
        .route("/list", get(handlers::scenarios::list_scenarios))
        .route("/{scenario_id}", get(handlers::scenarios::get_scenario));

    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .nest("/api/v1/voice", voice)
        .nest("/api/v1/conversation", conversation)
        .nest("/api/v1/scenarios", scenarios)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(propagate_request_id))
        .with_state(state)
}
