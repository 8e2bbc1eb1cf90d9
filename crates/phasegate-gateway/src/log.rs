// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request/response event logging.
//!
//! One record per completed request, one per failed request. Implementations
//! must swallow their own failures: a broken log sink never changes a
//! response that has already been computed.

use phasegate_core::types::{CoherenceState, GatingMode, SessionId, TraceId};
use phasegate_core::PhasegateError;

/// Summary of one completed request, written exactly once, synchronously
/// before the response is returned.
#[derive(Debug)]
pub struct LogEntry<'a> {
    pub trace_id: &'a TraceId,
    pub session_id: &'a SessionId,
    pub endpoint: &'a str,
    pub state: CoherenceState,
    /// `None` for `/event` requests, which never reach gating.
    pub mode: Option<GatingMode>,
    /// Human-readable gating summary; `None` when `mode` is.
    pub summary: Option<&'static str>,
    pub flag_count: usize,
}

/// Sink for per-request log records.
pub trait RequestLog: Send + Sync {
    /// Records one completed request. Must not propagate failure.
    fn log_request(&self, entry: &LogEntry<'_>);

    /// Records one failed request. Must not propagate failure.
    fn log_error(
        &self,
        trace_id: &TraceId,
        session_id: Option<&SessionId>,
        endpoint: &str,
        error: &PhasegateError,
    );
}

/// Tracing-backed log sink emitting one structured record per request.
#[derive(Debug, Clone, Default)]
pub struct TracingRequestLog;

impl RequestLog for TracingRequestLog {
    fn log_request(&self, entry: &LogEntry<'_>) {
        tracing::info!(
            trace_id = %entry.trace_id,
            session_id = %entry.session_id,
            endpoint = entry.endpoint,
            state = %entry.state,
            mode = entry.mode.map(|m| m.to_string()),
            summary = entry.summary,
            flags = entry.flag_count,
            "request complete"
        );
    }

    fn log_error(
        &self,
        trace_id: &TraceId,
        session_id: Option<&SessionId>,
        endpoint: &str,
        error: &PhasegateError,
    ) {
        tracing::error!(
            trace_id = %trace_id,
            session_id = session_id.map(|s| s.to_string()),
            endpoint,
            error = %error,
            "request failed"
        );
    }
}
