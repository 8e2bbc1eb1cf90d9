// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model routing for the Phasegate pipeline.
//!
//! This crate provides:
//! - [`build_messages`]: Context-aware chat message assembly (system prompt,
//!   history, current input)
//! - [`ModelRouter`]: Dispatch to a primary model with a single fallback
//!   retry; streaming dispatch with no fallback
//!
//! The router sits after the gating engine: it only ever sees prompts that
//! gating allowed through, already rewritten by the interventions.

pub mod messages;
pub mod router;

pub use messages::build_messages;
pub use router::ModelRouter;
