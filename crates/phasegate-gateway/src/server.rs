// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the pipeline.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use phasegate_config::{PolicyConfig, ServerConfig};
use phasegate_core::PhasegateError;
use phasegate_router::ModelRouter;

use crate::handlers;
use crate::log::RequestLog;

/// Shared state for axum request handlers.
///
/// Everything here is read-only per request: the policy is process-wide
/// configuration and the router holds no mutable state, so no cross-request
/// synchronization is needed.
#[derive(Clone)]
pub struct GatewayState {
    /// Dispatches allowed prompts to the model backend.
    pub router: ModelRouter,
    /// Gating policy defaults, passed explicitly into each decision.
    pub policy: PolicyConfig,
    /// Per-request event log sink.
    pub log: Arc<dyn RequestLog>,
}

/// Builds the gateway router.
pub fn build_app(state: GatewayState) -> Router {
    Router::new()
        .route("/chat", post(handlers::post_chat))
        .route("/chat-stream", post(handlers::post_chat_stream))
        .route("/event", post(handlers::post_event))
        .route("/health", get(handlers::get_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the gateway HTTP server and serves until shutdown.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), PhasegateError> {
    let app = build_app(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        PhasegateError::Internal(format!("failed to bind gateway to {addr}: {e}"))
    })?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| PhasegateError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
