// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end handler tests against the axum router with a mock provider.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use http::{Request, StatusCode};
use tower::ServiceExt;

use phasegate_config::{BackendConfig, PolicyConfig};
use phasegate_core::types::{SessionId, TraceId};
use phasegate_core::PhasegateError;
use phasegate_gateway::{build_app, GatewayState, LogEntry, RequestLog};
use phasegate_gating::ESCALATION_MESSAGE;
use phasegate_router::ModelRouter;
use phasegate_test_utils::MockProvider;

/// Log sink that records what was logged, for asserting log behavior.
#[derive(Default)]
struct CapturingLog {
    requests: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RequestLog for CapturingLog {
    fn log_request(&self, entry: &LogEntry<'_>) {
        self.requests
            .lock()
            .unwrap()
            .push(format!(
                "{} {} {}",
                entry.endpoint,
                entry.trace_id,
                entry.summary.unwrap_or("-")
            ));
    }

    fn log_error(
        &self,
        trace_id: &TraceId,
        _session_id: Option<&SessionId>,
        endpoint: &str,
        _error: &PhasegateError,
    ) {
        self.errors
            .lock()
            .unwrap()
            .push(format!("{endpoint} {trace_id}"));
    }
}

fn test_state(provider: Arc<MockProvider>, log: Arc<CapturingLog>) -> GatewayState {
    let backend = BackendConfig {
        default_model: "gpt-4o".into(),
        ..Default::default()
    };
    GatewayState {
        router: ModelRouter::new(provider, &backend),
        policy: PolicyConfig::default(),
        log,
    }
}

async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn chat_returns_full_envelope() {
    let provider = Arc::new(MockProvider::with_responses(vec!["A calm answer.".into()]));
    let log = Arc::new(CapturingLog::default());
    let app = build_app(test_state(provider, log.clone()));

    let (status, body) = post_json(
        app,
        "/chat",
        serde_json::json!({
            "message_id": "msg-1",
            "input_text": "What should I have for lunch today?"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message_id"], "msg-1");
    assert_eq!(body["answer"]["text"], "A calm answer.");
    assert_eq!(body["answer"]["style"], "conversational");
    assert_eq!(body["answer"]["language"], "en");
    assert_eq!(body["gating_decision"]["mode"], "normal");
    assert_eq!(body["routing_trace"]["primary_model"], "gpt-4o");
    assert_eq!(body["routing_trace"]["prompt_tokens"], 10);
    assert_eq!(body["logging"]["stored"], true);
    assert!(body["session_id"]
        .as_str()
        .unwrap()
        .starts_with("session-"));
    assert!(body["trace_id"].as_str().unwrap().starts_with("trace-"));
    let requests = log.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].contains("Normal processing"), "got: {}", requests[0]);
    assert!(log.errors.lock().unwrap().is_empty());
}

#[tokio::test]
async fn caller_supplied_session_id_is_kept() {
    let provider = Arc::new(MockProvider::new());
    let log = Arc::new(CapturingLog::default());
    let app = build_app(test_state(provider, log));

    let (status, body) = post_json(
        app,
        "/chat",
        serde_json::json!({
            "message_id": "msg-2",
            "input_text": "hello",
            "session_id": "session-existing"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session_id"], "session-existing");
}

#[tokio::test]
async fn self_harm_input_gets_emergency_disclaimer_but_routes_normally() {
    // Scenario: the safety screener and the gating engine are independent.
    let provider = Arc::new(MockProvider::with_responses(vec![
        "Please reach out to someone you trust.".into(),
    ]));
    let log = Arc::new(CapturingLog::default());
    let app = build_app(test_state(provider.clone(), log));

    let (status, body) = post_json(
        app,
        "/chat",
        serde_json::json!({
            "message_id": "msg-3",
            "input_text": "I want to kill myself"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let flags: Vec<String> = body["safety_flags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert!(flags.contains(&"self_harm".to_string()));
    assert_eq!(body["gating_decision"]["mode"], "normal");
    let text = body["answer"]["text"].as_str().unwrap();
    assert!(text.starts_with("Please reach out"));
    assert!(text.contains("call 911"), "got: {text}");
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn blocked_request_never_reaches_the_provider() {
    let provider = Arc::new(MockProvider::with_responses(vec![
        "should never appear".into(),
    ]));
    let log = Arc::new(CapturingLog::default());
    let app = build_app(test_state(provider.clone(), log.clone()));

    // A zero per-request critical ceiling forces the block branch.
    let (status, body) = post_json(
        app,
        "/chat",
        serde_json::json!({
            "message_id": "msg-4",
            "input_text": "any text at all",
            "overrides": {"max_delta_theta": 0.0}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gating_decision"]["mode"], "block");
    assert_eq!(body["answer"]["text"], ESCALATION_MESSAGE);
    assert_eq!(body["answer"]["style"], "clinical");
    assert!(body["routing_trace"].is_null());
    assert_eq!(provider.call_count(), 0);
    // Blocked requests still log exactly once, with the mode summary.
    let requests = log.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(
        requests[0].contains("Human intervention required"),
        "got: {}",
        requests[0]
    );
}

#[tokio::test]
async fn missing_input_text_is_400_with_no_chat_log() {
    let provider = Arc::new(MockProvider::new());
    let log = Arc::new(CapturingLog::default());
    let app = build_app(test_state(provider.clone(), log.clone()));

    let (status, body) = post_json(
        app,
        "/chat",
        serde_json::json!({"message_id": "msg-5"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "input_text is required");
    assert_eq!(provider.call_count(), 0);
    assert!(log.requests.lock().unwrap().is_empty());
    assert!(log.errors.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_message_id_is_400() {
    let provider = Arc::new(MockProvider::new());
    let log = Arc::new(CapturingLog::default());
    let app = build_app(test_state(provider, log));

    let (status, body) = post_json(
        app,
        "/chat",
        serde_json::json!({"input_text": "hello"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "message_id is required");
}

#[tokio::test]
async fn routing_failure_becomes_500_with_trace_id() {
    let provider = Arc::new(MockProvider::new());
    provider.add_failure("backend down").await;
    let log = Arc::new(CapturingLog::default());
    let app = build_app(test_state(provider, log.clone()));

    let (status, body) = post_json(
        app,
        "/chat",
        serde_json::json!({"message_id": "msg-6", "input_text": "hello"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert!(body["message"].as_str().unwrap().contains("backend down"));
    assert!(body["trace_id"].as_str().unwrap().starts_with("trace-"));
    assert_eq!(log.errors.lock().unwrap().len(), 1);
    assert!(log.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn clinical_tone_override_sets_answer_style() {
    let provider = Arc::new(MockProvider::new());
    let log = Arc::new(CapturingLog::default());
    let app = build_app(test_state(provider, log));

    let (_, body) = post_json(
        app,
        "/chat",
        serde_json::json!({
            "message_id": "msg-7",
            "input_text": "hello",
            "overrides": {"require_clinical_tone": true, "language": "es"}
        }),
    )
    .await;

    assert_eq!(body["answer"]["style"], "clinical");
    assert_eq!(body["answer"]["language"], "es");
}

#[tokio::test]
async fn event_endpoint_computes_metrics_without_routing() {
    let provider = Arc::new(MockProvider::new());
    let log = Arc::new(CapturingLog::default());
    let app = build_app(test_state(provider.clone(), log.clone()));

    let (status, body) = post_json(
        app,
        "/event",
        serde_json::json!({
            "event_id": "evt-1",
            "event_type": "uv_spike",
            "channel": "esp_lab",
            "signals": {"hrv": 48.0, "uv_index": 9.5}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event_id"], "evt-1");
    assert!(body["metrics"]["delta_theta"].is_number());
    assert!(body["metrics"]["phi_index"].is_number());
    assert_eq!(body["logging"]["stored"], true);
    assert!(body.get("gating_decision").is_none());
    assert_eq!(provider.call_count(), 0);
    assert_eq!(log.requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn event_endpoint_requires_event_type() {
    let provider = Arc::new(MockProvider::new());
    let log = Arc::new(CapturingLog::default());
    let app = build_app(test_state(provider, log.clone()));

    let (status, body) = post_json(
        app,
        "/event",
        serde_json::json!({"event_id": "evt-2"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "event_type is required");
    assert!(log.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let provider = Arc::new(MockProvider::new());
    let log = Arc::new(CapturingLog::default());
    let app = build_app(test_state(provider, log));

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn chat_stream_emits_meta_tokens_and_done() {
    let provider = Arc::new(MockProvider::with_responses(vec!["streamed words".into()]));
    let log = Arc::new(CapturingLog::default());
    let app = build_app(test_state(provider, log.clone()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat-stream")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({"message_id": "msg-8", "input_text": "hello"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/event-stream"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    let meta_pos = text.find("event: meta").expect("meta event");
    let token_pos = text.find("event: token").expect("token event");
    let done_pos = text.find("event: done").expect("done event");
    assert!(meta_pos < token_pos && token_pos < done_pos);
    assert!(text.contains("streamed words"));
    assert!(!text.contains("event: error"));
    assert_eq!(log.requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn chat_stream_blocked_emits_refusal_token_then_done() {
    let provider = Arc::new(MockProvider::new());
    let log = Arc::new(CapturingLog::default());
    let app = build_app(test_state(provider.clone(), log));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat-stream")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "message_id": "msg-9",
                        "input_text": "hello",
                        "overrides": {"max_delta_theta": 0.0}
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(text.contains("event: meta"));
    assert_eq!(text.matches("event: token").count(), 1);
    assert!(text.contains("human intervention"));
    assert!(text.contains("event: done"));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn chat_stream_setup_failure_emits_error_event() {
    let provider = Arc::new(MockProvider::new());
    provider.add_failure("stream refused").await;
    let log = Arc::new(CapturingLog::default());
    let app = build_app(test_state(provider, log.clone()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat-stream")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({"message_id": "msg-10", "input_text": "hello"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    // Headers already committed to a stream; the failure is in-band.
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(text.contains("event: meta"));
    assert!(text.contains("event: error"));
    assert!(!text.contains("event: done"));
    assert_eq!(log.errors.lock().unwrap().len(), 1);
}
