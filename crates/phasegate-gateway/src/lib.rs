// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway and pipeline orchestrator for the Phasegate middleware.
//!
//! Exposes four endpoints:
//! - `POST /chat` — full pipeline, JSON envelope response
//! - `POST /chat-stream` — full pipeline, SSE token stream
//! - `POST /event` — metrics-only logging for non-chat occurrences
//! - `GET /health` — liveness stub
//!
//! The pipeline per request: metrics, safety screening, gating, prompt
//! interventions, model routing, disclaimer, one synchronous log record.

pub mod handlers;
pub mod log;
pub mod pipeline;
pub mod server;
pub mod sse;

pub use log::{LogEntry, RequestLog, TracingRequestLog};
pub use server::{build_app, start_server, GatewayState};
