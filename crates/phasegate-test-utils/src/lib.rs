// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Phasegate integration tests.
//!
//! Provides a mock provider adapter for fast, deterministic, CI-runnable
//! tests without external model backends.

pub mod mock_provider;

pub use mock_provider::{MockProvider, ScriptedResult};
