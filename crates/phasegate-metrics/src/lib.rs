// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic coherence metrics for the Phasegate pipeline.
//!
//! [`evaluate`] maps `(text, context)` to [`CoherenceMetrics`] using
//! zero-cost heuristic signals. No network, no randomness: identical inputs
//! always produce identical metrics, so tests can assert exact outputs.

mod evaluator;

pub use evaluator::{classify_state, evaluate};
