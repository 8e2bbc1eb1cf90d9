// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers and envelope types.
//!
//! Handles POST /chat, POST /chat-stream, POST /event, GET /health.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use phasegate_core::types::{
    AnswerStyle, CoherenceMetrics, GatingDecision, GatingOverrides, ModelPrefs, RequestContext,
    SafetyFlag, SessionId, Signals, TraceId,
};
use phasegate_core::PhasegateError;

use crate::pipeline;
use crate::server::GatewayState;
use crate::sse;

/// Request body for POST /chat and POST /chat-stream.
///
/// Required fields are optional at the serde level so that a missing field
/// becomes a controlled 400 instead of a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub input_text: Option<String>,
    #[serde(default)]
    pub context: Option<RequestContext>,
    #[serde(default)]
    pub model_prefs: Option<ModelPrefs>,
    #[serde(default)]
    pub overrides: Option<GatingOverrides>,
}

impl ChatRequest {
    /// Validates required fields. Runs before any metrics are computed and
    /// before any chat event is logged.
    pub fn validate(&self) -> Result<(), PhasegateError> {
        if self.message_id.as_deref().is_none_or(str::is_empty) {
            return Err(PhasegateError::Validation("message_id is required".into()));
        }
        if self.input_text.as_deref().is_none_or(str::is_empty) {
            return Err(PhasegateError::Validation("input_text is required".into()));
        }
        Ok(())
    }

    /// Context for metrics/safety/routing, with the top-level channel
    /// folded in when the context itself carries none.
    pub fn effective_context(&self) -> Option<RequestContext> {
        match (&self.context, &self.channel) {
            (Some(ctx), Some(channel)) if ctx.channel.is_none() => Some(RequestContext {
                channel: Some(channel.clone()),
                ..ctx.clone()
            }),
            (Some(ctx), _) => Some(ctx.clone()),
            (None, Some(channel)) => Some(RequestContext {
                channel: Some(channel.clone()),
                ..Default::default()
            }),
            (None, None) => None,
        }
    }
}

/// Request body for POST /event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRequest {
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
    #[serde(default)]
    pub signals: Option<Signals>,
}

impl EventRequest {
    pub fn validate(&self) -> Result<(), PhasegateError> {
        if self.event_id.as_deref().is_none_or(str::is_empty) {
            return Err(PhasegateError::Validation("event_id is required".into()));
        }
        if self.event_type.as_deref().is_none_or(str::is_empty) {
            return Err(PhasegateError::Validation("event_type is required".into()));
        }
        Ok(())
    }
}

/// The answer block of a chat response.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: String,
    pub style: AnswerStyle,
    pub language: String,
}

/// Backend dispatch summary attached to routed responses.
#[derive(Debug, Clone, Serialize)]
pub struct RoutingTrace {
    pub primary_model: String,
    pub latency_ms: u64,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Logging summary attached to every successful response.
#[derive(Debug, Clone, Serialize)]
pub struct LoggingInfo {
    pub stored: bool,
    pub timestamp: String,
}

impl LoggingInfo {
    pub fn now() -> Self {
        Self {
            stored: true,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for POST /chat.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub session_id: SessionId,
    pub message_id: String,
    pub trace_id: TraceId,
    pub answer: Answer,
    pub metrics: CoherenceMetrics,
    pub gating_decision: GatingDecision,
    pub safety_flags: Vec<SafetyFlag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_trace: Option<RoutingTrace>,
    pub logging: LoggingInfo,
}

/// Response body for POST /event.
#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub session_id: SessionId,
    pub event_id: String,
    pub trace_id: TraceId,
    pub metrics: CoherenceMetrics,
    pub logging: LoggingInfo,
}

/// Error body for 400 responses.
#[derive(Debug, Serialize)]
pub struct ValidationErrorBody {
    pub error: String,
}

/// Error body for 500 responses.
#[derive(Debug, Serialize)]
pub struct InternalErrorBody {
    pub error: String,
    pub message: String,
    pub trace_id: TraceId,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

fn bad_request(error: &PhasegateError) -> Response {
    let body = ValidationErrorBody {
        error: match error {
            PhasegateError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        },
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

fn internal_error(failure: pipeline::PipelineFailure) -> Response {
    let body = InternalErrorBody {
        error: "Internal server error".to_string(),
        message: failure.error.to_string(),
        trace_id: failure.trace_id,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// POST /chat
pub async fn post_chat(
    State(state): State<GatewayState>,
    Json(body): Json<ChatRequest>,
) -> Response {
    if let Err(error) = body.validate() {
        return bad_request(&error);
    }

    match pipeline::run_chat(&state, body).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(failure) => internal_error(failure),
    }
}

/// POST /chat-stream
///
/// Validation failures are still HTTP 400; everything after the stream
/// headers commit is reported in-band as SSE events.
pub async fn post_chat_stream(
    State(state): State<GatewayState>,
    Json(body): Json<ChatRequest>,
) -> Response {
    if let Err(error) = body.validate() {
        return bad_request(&error);
    }

    sse::stream_chat(state, body).into_response()
}

/// POST /event
pub async fn post_event(
    State(state): State<GatewayState>,
    Json(body): Json<EventRequest>,
) -> Response {
    if let Err(error) = body.validate() {
        return bad_request(&error);
    }

    let response = pipeline::run_event(&state, body);
    (StatusCode::OK, Json(response)).into_response()
}

/// GET /health
pub async fn get_health() -> Response {
    let body = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (StatusCode::OK, Json(body)).into_response()
}
