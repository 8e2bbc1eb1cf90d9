// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Primary/fallback model dispatch.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use phasegate_config::BackendConfig;
use phasegate_core::types::{ModelPrefs, RequestContext, RoutingOutcome};
use phasegate_core::{PhasegateError, ProviderAdapter, ProviderRequest, ProviderStream};

use crate::messages::build_messages;

/// Routes completion requests to a backend model.
///
/// The primary model comes from request preferences or config defaults. On
/// any primary failure the router retries exactly once against the fallback
/// model, with the same messages and sampling parameters. There is no other
/// retry anywhere in the system.
#[derive(Clone)]
pub struct ModelRouter {
    provider: Arc<dyn ProviderAdapter>,
    default_model: String,
    fallback_model: Option<String>,
    max_tokens: u32,
    temperature: f64,
}

impl ModelRouter {
    pub fn new(provider: Arc<dyn ProviderAdapter>, backend: &BackendConfig) -> Self {
        Self {
            provider,
            default_model: backend.default_model.clone(),
            fallback_model: backend.fallback_model.clone(),
            max_tokens: backend.max_tokens,
            temperature: backend.temperature,
        }
    }

    fn request_for(
        &self,
        model: String,
        input: &str,
        prefs: &ModelPrefs,
        context: Option<&RequestContext>,
    ) -> ProviderRequest {
        ProviderRequest {
            model,
            messages: build_messages(input, context),
            max_tokens: prefs.max_tokens.unwrap_or(self.max_tokens),
            temperature: prefs.temperature.unwrap_or(self.temperature),
        }
    }

    /// Dispatches a completion request, with a single fallback retry.
    ///
    /// Reported latency is end-to-end and includes the fallback attempt.
    pub async fn route(
        &self,
        input: &str,
        prefs: &ModelPrefs,
        context: Option<&RequestContext>,
    ) -> Result<RoutingOutcome, PhasegateError> {
        let started = Instant::now();

        let primary = prefs
            .primary_model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());
        let request = self.request_for(primary.clone(), input, prefs, context);

        let response = match self.provider.complete(request).await {
            Ok(response) => response,
            Err(primary_err) => {
                let Some(fallback) = prefs
                    .fallback_model
                    .clone()
                    .or_else(|| self.fallback_model.clone())
                else {
                    return Err(PhasegateError::Routing(format!(
                        "model {primary} failed with no fallback configured: {primary_err}"
                    )));
                };

                warn!(primary = %primary, fallback = %fallback, error = %primary_err,
                    "primary model failed, retrying against fallback");
                let retry = self.request_for(fallback.clone(), input, prefs, context);
                self.provider.complete(retry).await.map_err(|fallback_err| {
                    PhasegateError::Routing(format!(
                        "primary model {primary} failed ({primary_err}); \
                         fallback model {fallback} failed ({fallback_err})"
                    ))
                })?
            }
        };

        let latency_ms = started.elapsed().as_millis() as u64;
        debug!(model = %response.model, latency_ms, "routing complete");

        Ok(RoutingOutcome {
            text: response.text,
            model: response.model,
            tokens: response.usage,
            latency_ms,
        })
    }

    /// Dispatches a streaming completion request. No fallback: a setup or
    /// mid-flight failure surfaces directly to the caller.
    pub async fn stream(
        &self,
        input: &str,
        prefs: &ModelPrefs,
        context: Option<&RequestContext>,
    ) -> Result<(String, ProviderStream), PhasegateError> {
        let model = prefs
            .primary_model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());
        let request = self.request_for(model.clone(), input, prefs, context);
        let stream = self.provider.stream(request).await?;
        Ok((model, stream))
    }
}
