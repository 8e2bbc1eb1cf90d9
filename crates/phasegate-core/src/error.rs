// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Phasegate pipeline.

use thiserror::Error;

/// The primary error type used across all Phasegate crates.
#[derive(Debug, Error)]
pub enum PhasegateError {
    /// Request validation errors (missing required fields). Rejected before
    /// any metrics are computed or any chat event is logged.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration errors (invalid TOML, out-of-order thresholds).
    #[error("configuration error: {0}")]
    Config(String),

    /// Model backend errors (HTTP failure, API error body, bad payload).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Both the primary and the fallback backend call failed.
    #[error("routing error: {0}")]
    Routing(String),

    /// Internal or unexpected errors within metrics/safety/gating.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PhasegateError {
    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        PhasegateError::Provider {
            message: message.into(),
            source: None,
        }
    }
}
