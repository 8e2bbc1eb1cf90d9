// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible chat-completions endpoints.
//!
//! Provides [`OpenAiProvider`] which handles request construction,
//! authentication, and streaming SSE responses. Errors are surfaced to the
//! caller unchanged: model fallback is the router's concern, not the client's.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use phasegate_config::BackendConfig;
use phasegate_core::types::TokenUsage;
use phasegate_core::{
    PhasegateError, ProviderAdapter, ProviderRequest, ProviderResponse, ProviderStream,
};

use crate::sse;
use crate::types::{ApiErrorResponse, CompletionRequest, CompletionResponse};

/// HTTP client for an OpenAI-compatible chat-completions backend.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiProvider {
    /// Creates a provider from backend configuration.
    ///
    /// Fails when no API key is configured.
    pub fn from_config(config: &BackendConfig) -> Result<Self, PhasegateError> {
        let Some(api_key) = config.api_key.as_deref() else {
            return Err(PhasegateError::Config(
                "backend.api_key is required (set PHASEGATE_BACKEND_API_KEY)".into(),
            ));
        };
        Self::new(api_key, config.base_url.clone(), config.timeout_secs)
    }

    /// Creates a new chat-completions client.
    pub fn new(
        api_key: &str,
        base_url: String,
        timeout_secs: u64,
    ) -> Result<Self, PhasegateError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
            PhasegateError::Config(format!("invalid API key header value: {e}"))
        })?;
        auth.set_sensitive(true);
        headers.insert("authorization", auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PhasegateError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { client, base_url })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    async fn send(
        &self,
        request: &ProviderRequest,
        stream: bool,
    ) -> Result<reqwest::Response, PhasegateError> {
        let body = CompletionRequest {
            model: request.model.clone(),
            messages: request.messages.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream,
        };

        let response = self
            .client
            .post(&self.base_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PhasegateError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, model = %request.model, stream, "backend response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
            format!(
                "backend API error ({}): {}",
                api_err.error.type_.as_deref().unwrap_or("unknown"),
                api_err.error.message
            )
        } else {
            format!("backend returned {status}: {body}")
        };
        Err(PhasegateError::Provider {
            message,
            source: None,
        })
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> Result<ProviderResponse, PhasegateError> {
        let response = self.send(&request, false).await?;

        let body = response.text().await.map_err(|e| PhasegateError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        let parsed: CompletionResponse =
            serde_json::from_str(&body).map_err(|e| PhasegateError::Provider {
                message: format!("failed to parse API response: {e}"),
                source: Some(Box::new(e)),
            })?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| PhasegateError::Provider {
                message: "API response contained no completion text".into(),
                source: None,
            })?;

        Ok(ProviderResponse {
            text,
            model: parsed.model,
            usage: TokenUsage {
                prompt: parsed.usage.prompt_tokens,
                completion: parsed.usage.completion_tokens,
            },
        })
    }

    async fn stream(&self, request: ProviderRequest) -> Result<ProviderStream, PhasegateError> {
        let response = self.send(&request, true).await?;
        Ok(sse::parse_sse_stream(response))
    }
}
