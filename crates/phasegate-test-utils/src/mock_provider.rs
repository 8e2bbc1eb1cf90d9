// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-configured results,
//! enabling fast, CI-runnable tests without external API calls. It also
//! counts invocations so tests can assert the router was (or was not) called.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream;
use tokio::sync::Mutex;

use phasegate_core::types::TokenUsage;
use phasegate_core::{
    PhasegateError, ProviderAdapter, ProviderRequest, ProviderResponse, ProviderStream,
    ProviderStreamChunk,
};

/// One scripted outcome for the mock provider.
#[derive(Debug, Clone)]
pub enum ScriptedResult {
    /// Succeed with this completion text.
    Text(String),
    /// Fail with a provider error carrying this message.
    Failure(String),
}

/// A mock provider that pops scripted results from a FIFO queue.
///
/// When the queue is empty, a default "mock response" text is returned.
/// Every `complete` or `stream` call increments a shared counter.
pub struct MockProvider {
    script: Arc<Mutex<VecDeque<ScriptedResult>>>,
    calls: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new mock provider with an empty script.
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock provider that returns the given texts in order.
    pub fn with_responses(texts: Vec<String>) -> Self {
        let provider = Self::new();
        {
            let mut queue = provider.script.try_lock().expect("fresh mutex");
            queue.extend(texts.into_iter().map(ScriptedResult::Text));
        }
        provider
    }

    /// Append a successful response to the script.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.script
            .lock()
            .await
            .push_back(ScriptedResult::Text(text.into()));
    }

    /// Append a failure to the script.
    pub async fn add_failure(&self, message: impl Into<String>) {
        self.script
            .lock()
            .await
            .push_back(ScriptedResult::Failure(message.into()));
    }

    /// Number of `complete` and `stream` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn next_result(&self) -> Result<String, PhasegateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().await.pop_front() {
            Some(ScriptedResult::Text(text)) => Ok(text),
            Some(ScriptedResult::Failure(message)) => Err(PhasegateError::Provider {
                message,
                source: None,
            }),
            None => Ok("mock response".to_string()),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> Result<ProviderResponse, PhasegateError> {
        let text = self.next_result().await?;
        Ok(ProviderResponse {
            text,
            model: request.model,
            usage: TokenUsage {
                prompt: 10,
                completion: 20,
            },
        })
    }

    async fn stream(&self, _request: ProviderRequest) -> Result<ProviderStream, PhasegateError> {
        let text = self.next_result().await?;

        // Chunk on word boundaries so streaming handlers see multiple deltas.
        let chunks: Vec<Result<ProviderStreamChunk, PhasegateError>> = text
            .split_inclusive(' ')
            .map(|piece| {
                Ok(ProviderStreamChunk {
                    text: piece.to_string(),
                })
            })
            .collect();

        Ok(Box::pin(stream::iter(chunks)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use phasegate_core::ChatMessage;

    fn request() -> ProviderRequest {
        ProviderRequest {
            model: "test-model".to_string(),
            messages: vec![ChatMessage::user("hi")],
            max_tokens: 100,
            temperature: 0.4,
        }
    }

    #[tokio::test]
    async fn default_response_when_script_empty() {
        let provider = MockProvider::new();
        let resp = provider.complete(request()).await.unwrap();
        assert_eq!(resp.text, "mock response");
        assert_eq!(resp.model, "test-model");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn scripted_results_returned_in_order() {
        let provider = MockProvider::with_responses(vec!["first".into(), "second".into()]);
        provider.add_failure("backend down").await;

        assert_eq!(provider.complete(request()).await.unwrap().text, "first");
        assert_eq!(provider.complete(request()).await.unwrap().text, "second");
        let err = provider.complete(request()).await.unwrap_err();
        assert!(err.to_string().contains("backend down"));
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn stream_chunks_on_word_boundaries() {
        let provider = MockProvider::with_responses(vec!["one two three".into()]);
        let mut stream = provider.stream(request()).await.unwrap();

        let mut pieces = Vec::new();
        while let Some(chunk) = stream.next().await {
            pieces.push(chunk.unwrap().text);
        }
        assert!(pieces.len() > 1);
        assert_eq!(pieces.concat(), "one two three");
    }

    #[tokio::test]
    async fn stream_failure_surfaces_before_any_chunk() {
        let provider = MockProvider::new();
        provider.add_failure("stream refused").await;
        let result = provider.stream(request()).await;
        assert!(result.is_err());
    }
}
