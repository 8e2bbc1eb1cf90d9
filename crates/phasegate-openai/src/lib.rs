// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible chat-completions provider adapter.
//!
//! Implements [`phasegate_core::ProviderAdapter`] over the standard
//! chat-completions wire format, with SSE streaming. The client performs no
//! transient retry of its own: the only retry in the system is the router's
//! primary-to-fallback chain.

mod client;
mod sse;
mod types;

pub use client::OpenAiProvider;
