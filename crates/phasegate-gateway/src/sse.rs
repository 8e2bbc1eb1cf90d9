// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-Sent Events streaming for POST /chat-stream.
//!
//! Event protocol:
//! ```text
//! event: meta
//! data: {"session_id": ..., "trace_id": ..., "metrics": ..., "gating_decision": ..., "safety_flags": [...]}
//!
//! event: token
//! data: {"text": "one fragment"}
//!
//! event: done
//! data: {"text": "full assembled text", "style": "conversational", "language": "en"}
//!
//! event: error
//! data: {"error": "...", "trace_id": ...}
//! ```
//!
//! `meta` always comes first. The blocked path emits the fixed refusal as a
//! single token followed by `done`. `error` is terminal and mutually
//! exclusive with further events; it is used for every failure after the
//! response headers have committed to a stream. Each backend chunk becomes
//! exactly one `token` event, in arrival order, with no buffering beyond
//! the chunk in flight.

use std::convert::Infallible;

use axum::response::sse::{Event, Sse};
use futures::channel::mpsc;
use futures::{SinkExt, StreamExt};

use phasegate_core::types::{AnswerStyle, SessionId, TraceId};
use phasegate_gating::{apply_interventions, decide, explain, ESCALATION_MESSAGE};
use phasegate_metrics::evaluate;
use phasegate_safety::{disclaimer_for, screen};

use crate::handlers::ChatRequest;
use crate::log::LogEntry;
use crate::server::GatewayState;

type SseItem = Result<Event, Infallible>;
type SseSender = mpsc::Sender<SseItem>;

/// Streams a chat response as Server-Sent Events.
///
/// The pipeline runs on a spawned task feeding a bounded channel; when the
/// client disconnects the receiver is dropped, sends start failing, and the
/// task unwinds, dropping the upstream model stream with it.
pub fn stream_chat(
    state: GatewayState,
    body: ChatRequest,
) -> Sse<impl futures::Stream<Item = SseItem>> {
    let (tx, rx) = mpsc::channel::<SseItem>(1);
    tokio::spawn(run_stream(state, body, tx));
    Sse::new(rx)
}

fn event(name: &str, data: serde_json::Value) -> SseItem {
    Ok(Event::default().event(name.to_string()).data(data.to_string()))
}

async fn run_stream(state: GatewayState, body: ChatRequest, mut tx: SseSender) {
    let trace_id = TraceId::generate();
    let session_id = body
        .session_id
        .clone()
        .map(SessionId)
        .unwrap_or_else(SessionId::generate);

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

    let meta = event(
        "meta",
        serde_json::json!({
            "session_id": &session_id,
            "trace_id": &trace_id,
            "metrics": &metrics,
            "gating_decision": &decision,
            "safety_flags": &safety_flags,
        }),
    );
    if tx.send(meta).await.is_err() {
        return;
    }

    if decision.is_blocked() {
        let token = event("token", serde_json::json!({"text": ESCALATION_MESSAGE}));
        let done = event(
            "done",
            serde_json::json!({
                "text": ESCALATION_MESSAGE,
                "style": AnswerStyle::Clinical,
                "language": language,
            }),
        );
        if tx.send(token).await.is_err() || tx.send(done).await.is_err() {
            return;
        }

        state.log.log_request(&LogEntry {
            trace_id: &trace_id,
            session_id: &session_id,
            endpoint: "/chat-stream",
            state: metrics.state,
            mode: Some(decision.mode),
            summary: Some(explain(&decision)),
            flag_count: safety_flags.len(),
        });
        return;
    }

    let prompt = apply_interventions(&input_text, &decision, context.as_ref());
    let prefs = body.model_prefs.clone().unwrap_or_default();

    let mut stream = match state.router.stream(&prompt, &prefs, context.as_ref()).await {
        Ok((_model, stream)) => stream,
        Err(error) => {
            state
                .log
                .log_error(&trace_id, Some(&session_id), "/chat-stream", &error);
            let _ = tx
                .send(event(
                    "error",
                    serde_json::json!({"error": error.to_string(), "trace_id": &trace_id}),
                ))
                .await;
            return;
        }
    };

    let mut assembled = String::new();
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(chunk) => {
                assembled.push_str(&chunk.text);
                let token = event("token", serde_json::json!({"text": chunk.text}));
                if tx.send(token).await.is_err() {
                    return;
                }
            }
            Err(error) => {
                state
                    .log
                    .log_error(&trace_id, Some(&session_id), "/chat-stream", &error);
                let _ = tx
                    .send(event(
                        "error",
                        serde_json::json!({"error": error.to_string(), "trace_id": &trace_id}),
                    ))
                    .await;
                return;
            }
        }
    }

    if let Some(disclaimer) = disclaimer_for(&safety_flags) {
        let fragment = format!("\n\n{disclaimer}");
        assembled.push_str(&fragment);
        let token = event("token", serde_json::json!({"text": fragment}));
        if tx.send(token).await.is_err() {
            return;
        }
    }

    let style = if body.overrides.as_ref().is_some_and(|o| o.require_clinical_tone) {
        AnswerStyle::Clinical
    } else {
        AnswerStyle::Conversational
    };

    let done = event(
        "done",
        serde_json::json!({
            "text": assembled,
            "style": style,
            "language": language,
        }),
    );
    if tx.send(done).await.is_err() {
        return;
    }

    state.log.log_request(&LogEntry {
        trace_id: &trace_id,
        session_id: &session_id,
        endpoint: "/chat-stream",
        state: metrics.state,
        mode: Some(decision.mode),
        summary: Some(explain(&decision)),
        flag_count: safety_flags.len(),
    });
}
