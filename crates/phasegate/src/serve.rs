// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `phasegate serve` command implementation.
//!
//! Wires the chat-completions provider, the model router, and the axum
//! gateway together from loaded configuration, then serves until the
//! process is stopped.

use std::sync::Arc;

use phasegate_config::PhasegateConfig;
use phasegate_core::PhasegateError;
use phasegate_gateway::{GatewayState, TracingRequestLog};
use phasegate_openai::OpenAiProvider;
use phasegate_router::ModelRouter;
use tracing::info;

pub async fn run(config: PhasegateConfig) -> Result<(), PhasegateError> {
    let provider = OpenAiProvider::from_config(&config.backend)?;

    info!(
        model = %config.backend.default_model,
        fallback = config.backend.fallback_model.as_deref(),
        "provider initialized"
    );

    let state = GatewayState {
        router: ModelRouter::new(Arc::new(provider), &config.backend),
        policy: config.policy,
        log: Arc::new(TracingRequestLog),
    };

    phasegate_gateway::start_server(&config.server, state).await
}
