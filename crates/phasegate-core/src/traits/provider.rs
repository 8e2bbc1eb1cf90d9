// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for generative-text backends.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;
use serde::{Deserialize, Serialize};

use crate::error::PhasegateError;
use crate::types::TokenUsage;

/// One message in the chat-style request sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user", or "assistant".
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A request to a generative-text backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
}

/// A complete response from a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub text: String,
    pub model: String,
    pub usage: TokenUsage,
}

/// A single incremental text fragment from a streaming response.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderStreamChunk {
    pub text: String,
}

/// Boxed stream of incremental chunks from a backend.
pub type ProviderStream =
    Pin<Box<dyn Stream<Item = Result<ProviderStreamChunk, PhasegateError>> + Send>>;

/// Adapter for generative-text backend integrations.
///
/// Implementations handle one backend API; model selection and the
/// primary/fallback chain live in the router, not here.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Stable adapter name for logs and routing traces.
    fn name(&self) -> &str;

    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ProviderRequest)
        -> Result<ProviderResponse, PhasegateError>;

    /// Sends a completion request and returns a stream of text chunks.
    async fn stream(&self, request: ProviderRequest) -> Result<ProviderStream, PhasegateError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_message_constructors_set_roles() {
        assert_eq!(ChatMessage::system("s").role, "system");
        assert_eq!(ChatMessage::user("u").role, "user");
    }

    #[test]
    fn chat_message_serializes_flat() {
        let msg = ChatMessage::user("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");
    }
}
