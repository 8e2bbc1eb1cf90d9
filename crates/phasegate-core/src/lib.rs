// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core types for the Phasegate coherence-gating middleware.
//!
//! Defines the error taxonomy, the domain types shared by every pipeline
//! stage (metrics, safety flags, gating decisions, routing outcomes), and
//! the [`ProviderAdapter`] trait implemented by model backends.

pub mod error;
pub mod traits;
pub mod types;

pub use error::PhasegateError;
pub use traits::provider::{
    ChatMessage, ProviderAdapter, ProviderRequest, ProviderResponse, ProviderStream,
    ProviderStreamChunk,
};
