// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The synchronous request pipeline.
//!
//! Per request: compute metrics, screen for safety flags, gate, then either
//! short-circuit with the escalation message (blocked) or rewrite the prompt
//! and route it to a model. The disclaimer selected from the safety flags is
//! appended to routed text. Each request is logged exactly once,
//! synchronously, before the response is returned; the blocked path logs
//! like any other.

use phasegate_core::types::{AnswerStyle, GatingMode, SessionId, TraceId};
use phasegate_core::PhasegateError;
use phasegate_gating::{apply_interventions, decide, explain, ESCALATION_MESSAGE};
use phasegate_metrics::evaluate;
use phasegate_safety::{disclaimer_for, screen};

use crate::handlers::{
    Answer, ChatRequest, ChatResponse, EventRequest, EventResponse, LoggingInfo, RoutingTrace,
};
use crate::log::LogEntry;
use crate::server::GatewayState;

/// A failed pipeline run, carrying the trace id minted for the request so
/// the caller can correlate the 500 payload with the error log.
#[derive(Debug)]
pub struct PipelineFailure {
    pub trace_id: TraceId,
    pub error: PhasegateError,
}

fn session_id_for(supplied: Option<&String>) -> SessionId {
    supplied
        .map(|id| SessionId(id.clone()))
        .unwrap_or_else(SessionId::generate)
}

/// Runs the full chat pipeline for an already-validated request.
pub async fn run_chat(
    state: &GatewayState,
    body: ChatRequest,
) -> Result<ChatResponse, PipelineFailure> {
    let trace_id = TraceId::generate();
    let session_id = session_id_for(body.session_id.as_ref());

    let message_id = body.message_id.clone().unwrap_or_default();
    let input_text = body.input_text.clone().unwrap_or_default();
    let context = body.effective_context();

    let metrics = evaluate(&input_text, context.as_ref());
    let safety_flags = screen(&input_text, context.as_ref());
    let decision = decide(&metrics, &state.policy, body.overrides.as_ref());

    let language = body
        .overrides
        .as_ref()
        .and_then(|o| o.language.clone())
        .unwrap_or_else(|| "en".to_string());

    if decision.is_blocked() {
        let response = ChatResponse {
            session_id: session_id.clone(),
            message_id,
            trace_id: trace_id.clone(),
            answer: Answer {
                text: ESCALATION_MESSAGE.to_string(),
                style: AnswerStyle::Clinical,
                language,
            },
            metrics,
            gating_decision: decision,
            safety_flags,
            routing_trace: None,
            logging: LoggingInfo::now(),
        };

        state.log.log_request(&LogEntry {
            trace_id: &trace_id,
            session_id: &session_id,
            endpoint: "/chat",
            state: response.metrics.state,
            mode: Some(GatingMode::Block),
            summary: Some(explain(&response.gating_decision)),
            flag_count: response.safety_flags.len(),
        });

        return Ok(response);
    }

    let prompt = apply_interventions(&input_text, &decision, context.as_ref());
    let prefs = body.model_prefs.clone().unwrap_or_default();

    let routed = match state.router.route(&prompt, &prefs, context.as_ref()).await {
        Ok(routed) => routed,
        Err(error) => {
            state
                .log
                .log_error(&trace_id, Some(&session_id), "/chat", &error);
            return Err(PipelineFailure { trace_id, error });
        }
    };

    let mut text = routed.text;
    if let Some(disclaimer) = disclaimer_for(&safety_flags) {
        text = format!("{text}\n\n{disclaimer}");
    }

    let style = if body.overrides.as_ref().is_some_and(|o| o.require_clinical_tone) {
        AnswerStyle::Clinical
    } else {
        AnswerStyle::Conversational
    };

    let response = ChatResponse {
        session_id: session_id.clone(),
        message_id,
        trace_id: trace_id.clone(),
        answer: Answer {
            text,
            style,
            language,
        },
        metrics,
        gating_decision: decision,
        safety_flags,
        routing_trace: Some(RoutingTrace {
            primary_model: routed.model,
            latency_ms: routed.latency_ms,
            prompt_tokens: routed.tokens.prompt,
            completion_tokens: routed.tokens.completion,
        }),
        logging: LoggingInfo::now(),
    };

    state.log.log_request(&LogEntry {
        trace_id: &trace_id,
        session_id: &session_id,
        endpoint: "/chat",
        state: response.metrics.state,
        mode: Some(response.gating_decision.mode),
        summary: Some(explain(&response.gating_decision)),
        flag_count: response.safety_flags.len(),
    });

    Ok(response)
}

/// Runs the event pipeline: metrics only, no gating, no routing.
pub fn run_event(state: &GatewayState, body: EventRequest) -> EventResponse {
    let trace_id = TraceId::generate();
    let session_id = session_id_for(body.session_id.as_ref());
    let event_id = body.event_id.clone().unwrap_or_default();

    // The serialized event is the evaluator's input text.
    let input_text = serde_json::json!({
        "event_type": &body.event_type,
        "payload": &body.payload,
        "signals": &body.signals,
    })
    .to_string();

    let context = phasegate_core::types::RequestContext {
        channel: body.channel.clone(),
        signals: body.signals.clone(),
        ..Default::default()
    };

    let metrics = evaluate(&input_text, Some(&context));

    let response = EventResponse {
        session_id: session_id.clone(),
        event_id,
        trace_id: trace_id.clone(),
        metrics,
        logging: LoggingInfo::now(),
    };

    state.log.log_request(&LogEntry {
        trace_id: &trace_id,
        session_id: &session_id,
        endpoint: "/event",
        state: response.metrics.state,
        mode: None,
        summary: None,
        flag_count: 0,
    });

    response
}
