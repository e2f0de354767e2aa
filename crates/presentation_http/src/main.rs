//! Koica Lang HTTP server
//!
//! Wires the Google speech and Gemini adapters into the learning services
//! and serves the API until Ctrl+C or SIGTERM.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{Context, anyhow};
use application::{
    ConversationService, PronunciationFeedbackPort, PronunciationService, SpeechRecognitionPort,
    SpeechService, SpeechSynthesisPort, TutorService,
};
use axum::http::{HeaderValue, Method, header};
use infrastructure::{AppConfig, GeminiInferenceAdapter, GoogleSpeechAdapter, init_logging};
use presentation_http::{
    RateLimiterConfig, RateLimiterLayer, create_router, set_expose_internal_errors,
    spawn_cleanup_task, state::AppState,
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_logging(&config.logging).context("failed to initialize logging")?;
    config
        .validate()
        .map_err(|e| anyhow!("invalid configuration: {e}"))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "Starting {}",
        config.app_name
    );

    set_expose_internal_errors(!config.is_production());

    let speech_adapter = Arc::new(
        GoogleSpeechAdapter::new(config.speech.clone())
            .context("failed to initialize speech backend")?,
    );
    let inference = Arc::new(
        GeminiInferenceAdapter::new(config.inference.clone())
            .context("failed to initialize inference backend")?,
    );

    let timeout = config.learning.backend_timeout();
    let recognizer: Arc<dyn SpeechRecognitionPort> = speech_adapter.clone();
    let synthesizer: Arc<dyn SpeechSynthesisPort> = speech_adapter;

    let tutor = Arc::new(TutorService::with_timeout(inference, timeout));
    let feedback: Arc<dyn PronunciationFeedbackPort> = tutor.clone();
    let speech = Arc::new(SpeechService::with_timeout(
        Arc::clone(&recognizer),
        synthesizer,
        timeout,
    ));

    let state = AppState {
        pronunciation: Arc::new(PronunciationService::with_timeout(
            recognizer, feedback, timeout,
        )),
        conversation: Arc::new(ConversationService::new(tutor, Arc::clone(&speech))),
        speech,
        config: Arc::new(config.clone()),
    };

    let rate_limiter = RateLimiterLayer::new(&RateLimiterConfig::from(&config.security));
    if config.security.rate_limit_enabled {
        spawn_cleanup_task(
            rate_limiter.state(),
            Duration::from_secs(config.security.rate_limit_cleanup_interval_secs),
        );
    }

    let app = create_router(state)
        .layer(rate_limiter)
        .layer(cors_layer(&config.server.allowed_origins));

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Listening");

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
    .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Restrict CORS to the configured origins, or allow any when none are set
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            },
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C"),
        () = terminate => info!("Received SIGTERM"),
    }

    info!(?timeout, "Draining connections");
    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        warn!("Connections still open after shutdown timeout, exiting");
        std::process::exit(0);
    });
}
