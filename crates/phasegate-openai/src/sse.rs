// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE stream parser for chat-completions streaming responses.
//!
//! Converts a reqwest response byte stream into [`ProviderStreamChunk`]s using
//! the `eventsource-stream` crate for SSE protocol compliance. The
//! chat-completions protocol uses data-only events terminated by a literal
//! `[DONE]` sentinel.

use eventsource_stream::Eventsource;
use futures::stream::StreamExt;

use phasegate_core::{PhasegateError, ProviderStream, ProviderStreamChunk};

use crate::types::StreamChunk;

/// Parses a reqwest streaming response into a stream of text chunks.
///
/// Chunks with no text delta (role announcements, finish markers) are
/// silently skipped. The stream ends at the `[DONE]` sentinel or when the
/// underlying connection closes.
pub fn parse_sse_stream(response: reqwest::Response) -> ProviderStream {
    let event_stream = response.bytes_stream().eventsource();

    let mapped = event_stream
        .take_while(|result| {
            let done = matches!(result, Ok(event) if event.data.trim() == "[DONE]");
            async move { !done }
        })
        .filter_map(|result| async move {
            match result {
                Ok(event) => match serde_json::from_str::<StreamChunk>(&event.data) {
                    Ok(chunk) => chunk
                        .choices
                        .into_iter()
                        .next()
                        .and_then(|choice| choice.delta.content)
                        .filter(|text| !text.is_empty())
                        .map(|text| Ok(ProviderStreamChunk { text })),
                    Err(e) => Some(Err(PhasegateError::Provider {
                        message: format!("failed to parse stream chunk: {e}"),
                        source: Some(Box::new(e)),
                    })),
                },
                Err(e) => Some(Err(PhasegateError::Provider {
                    message: format!("SSE stream error: {e}"),
                    source: Some(Box::new(e)),
                })),
            }
        });

    Box::pin(mapped)
}
