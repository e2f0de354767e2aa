//! Integration tests for the infrastructure adapters
//!
//! Drives the adapters, and the pronunciation flow built on them, against
//! mocked Google speech and Gemini REST APIs.

use std::sync::Arc;

use ai_core::InferenceConfig;
use ai_speech::SpeechConfig;
use application::{
    ApplicationError, InferencePort, PronunciationService, SpeechRecognitionPort,
    SpeechSynthesisPort, SynthesisOptions, TutorService, VoiceGender,
};
use domain::{Grade, PronunciationOutcome};
use infrastructure::{GeminiInferenceAdapter, GoogleSpeechAdapter};
use secrecy::SecretString;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn speech_adapter(server: &MockServer) -> GoogleSpeechAdapter {
    GoogleSpeechAdapter::new(SpeechConfig {
        api_key: Some(SecretString::from("speech-key")),
        stt_base_url: server.uri(),
        tts_base_url: server.uri(),
        timeout_ms: 5000,
        ..SpeechConfig::default()
    })
    .unwrap()
}

fn inference_adapter(server: &MockServer) -> GeminiInferenceAdapter {
    GeminiInferenceAdapter::new(InferenceConfig {
        api_key: Some(SecretString::from("gemini-key")),
        base_url: server.uri(),
        default_model: "gemini-test".to_string(),
        timeout_ms: 5000,
        ..InferenceConfig::default()
    })
    .unwrap()
}

fn recognize_response(transcript: &str, confidence: f64) -> serde_json::Value {
    serde_json::json!({
        "results": [{
            "alternatives": [{"transcript": transcript, "confidence": confidence}]
        }]
    })
}

fn gemini_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"},
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 30,
            "candidatesTokenCount": 20,
            "totalTokenCount": 50
        }
    })
}

async fn mount_gemini(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path("/models/gemini-test:generateContent"))
        .and(query_param("key", "gemini-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_response(text)))
        .mount(server)
        .await;
}

// ============================================================================
// Speech adapter
// ============================================================================

mod speech_adapter_tests {
    use super::*;

    #[tokio::test]
    async fn transcribe_converts_words_to_observations() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/speech:recognize"))
            .and(query_param("key", "speech-key"))
            .and(body_partial_json(serde_json::json!({
                "config": {"languageCode": "lo-LA", "enableWordTimeOffsets": true}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{
                    "alternatives": [{
                        "transcript": "ສະບາຍດີ",
                        "confidence": 0.8,
                        "words": [
                            {"word": "ສະບາຍດີ", "startTime": "0.200s", "endTime": "1.100s", "confidence": 0.65}
                        ]
                    }]
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = speech_adapter(&server)
            .transcribe(vec![1, 2, 3], "lo-LA", true)
            .await
            .unwrap();

        assert_eq!(result.transcript, "ສະບາຍດີ");
        assert_eq!(result.words.len(), 1);
        assert!((result.words[0].start_time - 0.2).abs() < 1e-9);
        assert!((result.words[0].end_time - 1.1).abs() < 1e-9);
        assert!((result.words[0].confidence - 0.65).abs() < 1e-6);
    }

    #[tokio::test]
    async fn threshold_word_confidence_survives_the_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/speech:recognize"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"results": [{"alternatives": [{"transcript": "xin chào", "confidence": 0.7,
                    "words": [
                        {"word": "xin", "startTime": "0s", "endTime": "0.300s", "confidence": 0.7},
                        {"word": "chào", "startTime": "0.300s", "endTime": "0.700s", "confidence": 0.69}
                    ]}]}]}"#,
            ))
            .mount(&server)
            .await;

        let result = speech_adapter(&server)
            .transcribe(vec![1, 2, 3], "vi-VN", true)
            .await
            .unwrap();
        let analysis = domain::scoring::analyze_words(&result.words);

        assert!((result.confidence - 0.7).abs() < f64::EPSILON);
        assert!((result.words[0].confidence - 0.7).abs() < f64::EPSILON);
        assert!(!analysis[0].needs_practice);
        assert!(analysis[1].needs_practice);
    }

    #[tokio::test]
    async fn transcribe_without_results_is_no_speech() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/speech:recognize"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let result = speech_adapter(&server)
            .transcribe(vec![0; 32], "km-KH", true)
            .await
            .unwrap();

        assert!(result.is_no_speech());
    }

    #[tokio::test]
    async fn quota_errors_map_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/speech:recognize"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}
            })))
            .mount(&server)
            .await;

        let result = speech_adapter(&server)
            .transcribe(vec![1], "km-KH", false)
            .await;

        assert!(matches!(result, Err(ApplicationError::RateLimited)));
    }

    #[tokio::test]
    async fn synthesize_returns_mp3_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/text:synthesize"))
            .and(body_partial_json(serde_json::json!({
                "input": {"text": "ជំរាបសួរ"},
                "voice": {"languageCode": "km-KH", "ssmlGender": "FEMALE"},
                "audioConfig": {"audioEncoding": "MP3"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "audioContent": "SUQzBA=="
            })))
            .expect(1)
            .mount(&server)
            .await;

        let options = SynthesisOptions::new("km-KH").with_gender(VoiceGender::Female);
        let result = speech_adapter(&server)
            .synthesize("ជំរាបសួរ", &options)
            .await
            .unwrap();

        assert_eq!(result.audio_data, b"ID3\x04".to_vec());
        assert_eq!(result.mime_type, "audio/mpeg");
        assert_eq!(result.language_code, "km-KH");
    }

    #[tokio::test]
    async fn list_voices_maps_descriptors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/voices"))
            .and(query_param("languageCode", "vi-VN"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "voices": [{
                    "name": "vi-VN-Standard-A",
                    "languageCodes": ["vi-VN"],
                    "ssmlGender": "FEMALE",
                    "naturalSampleRateHertz": 24000
                }]
            })))
            .mount(&server)
            .await;

        let voices = speech_adapter(&server)
            .list_voices(Some("vi-VN".to_string()))
            .await
            .unwrap();

        assert_eq!(voices.len(), 1);
        assert_eq!(voices[0].name, "vi-VN-Standard-A");
        assert_eq!(voices[0].gender, VoiceGender::Female);
        assert_eq!(voices[0].natural_sample_rate_hertz, 24000);
    }
}

// ============================================================================
// Inference adapter
// ============================================================================

mod inference_adapter_tests {
    use super::*;

    #[tokio::test]
    async fn generate_json_requests_json_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-test:generateContent"))
            .and(body_partial_json(serde_json::json!({
                "systemInstruction": {"parts": [{"text": "You are a tutor."}]},
                "generationConfig": {"responseMimeType": "application/json"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_response("{\"ok\":1}")))
            .expect(1)
            .mount(&server)
            .await;

        let result = inference_adapter(&server)
            .generate_json("You are a tutor.", "hello")
            .await
            .unwrap();

        assert_eq!(result.content, "{\"ok\":1}");
        assert_eq!(result.model, "gemini-test");
        assert_eq!(result.tokens_used, Some(50));
    }

    #[tokio::test]
    async fn rejected_key_maps_to_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-test:generateContent"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error": {"code": 403, "message": "Permission denied", "status": "PERMISSION_DENIED"}
            })))
            .mount(&server)
            .await;

        let result = inference_adapter(&server)
            .generate_with_system("system", "hello")
            .await;

        assert!(matches!(result, Err(ApplicationError::Unavailable(_))));
    }

    #[tokio::test]
    async fn health_reflects_model_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models/gemini-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "models/gemini-test"
            })))
            .mount(&server)
            .await;

        assert!(inference_adapter(&server).is_healthy().await);
    }
}

// ============================================================================
// Pronunciation flow over real adapters
// ============================================================================

mod pronunciation_flow_tests {
    use super::*;

    fn service(server: &MockServer) -> PronunciationService {
        let tutor = Arc::new(TutorService::new(Arc::new(inference_adapter(server))));
        PronunciationService::new(Arc::new(speech_adapter(server)), tutor)
    }

    #[tokio::test]
    async fn matching_utterance_scores_an_a() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/speech:recognize"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(recognize_response("hello", 0.9)),
            )
            .mount(&server)
            .await;
        mount_gemini(
            &server,
            r#"{"accuracy_score": 92, "pronunciation_feedback": "아주 좋아요",
                "grammar_feedback": "", "naturalness_score": 88,
                "suggestions": ["억양을 살려 보세요"], "correct_version": "hello"}"#,
        )
        .await;

        let outcome = service(&server)
            .evaluate(vec![1, 2, 3], Some("hello"), "en-US")
            .await
            .unwrap();

        let PronunciationOutcome::Evaluated(evaluation) = outcome else {
            panic!("expected an evaluation");
        };
        assert!((evaluation.overall_score - 93.0).abs() < f64::EPSILON);
        assert!((evaluation.similarity_score_pct - 100.0).abs() < f64::EPSILON);
        assert_eq!(evaluation.grade, Grade::A);
        assert_eq!(evaluation.pronunciation_feedback, "아주 좋아요");
        assert_eq!(evaluation.suggestions, vec!["억양을 살려 보세요"]);
    }

    #[tokio::test]
    async fn prose_feedback_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/speech:recognize"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(recognize_response("sok sabay", 0.8)),
            )
            .mount(&server)
            .await;
        mount_gemini(&server, "Your pronunciation is clear.").await;

        let outcome = service(&server)
            .evaluate(vec![1], None, "km-KH")
            .await
            .unwrap();

        let PronunciationOutcome::Evaluated(evaluation) = outcome else {
            panic!("expected an evaluation");
        };
        assert!((evaluation.llm_feedback.accuracy_score - 50.0).abs() < f64::EPSILON);
        assert_eq!(
            evaluation.llm_feedback.pronunciation_feedback,
            "Your pronunciation is clear."
        );
    }

    #[tokio::test]
    async fn silence_skips_the_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/speech:recognize"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-test:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_response("{}")))
            .expect(0)
            .mount(&server)
            .await;

        let outcome = service(&server)
            .evaluate(vec![1], Some("hello"), "km-KH")
            .await
            .unwrap();

        assert!(matches!(outcome, PronunciationOutcome::NoSpeechDetected(_)));
    }
}
