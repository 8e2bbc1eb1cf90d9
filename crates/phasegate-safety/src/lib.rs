// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pattern-based safety screening for the Phasegate pipeline.
//!
//! Independent of the coherence metrics: a perfectly coherent request can
//! still raise flags, and a blocked request is screened all the same. The
//! screener is pure and never errors; malformed context is treated as
//! absent.

mod disclaimer;
mod screen;

pub use disclaimer::disclaimer_for;
pub use screen::screen;
