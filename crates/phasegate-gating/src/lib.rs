// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gating for the Phasegate pipeline.
//!
//! [`decide`] maps coherence metrics, the active policy, and optional
//! per-request overrides to a terminal [`GatingDecision`];
//! [`apply_interventions`] rewrites the outbound prompt accordingly. The
//! policy is passed explicitly on every call; there is no module-level
//! state.

mod decide;
mod intervene;

pub use decide::{decide, ESCALATION_MESSAGE};
pub use intervene::apply_interventions;

use phasegate_core::types::GatingDecision;

/// Re-exported for callers assembling responses.
pub use phasegate_core::types::GatingMode;

/// Human-readable explanation of a gating decision, for logs and UIs.
pub fn explain(decision: &GatingDecision) -> &'static str {
    match decision.mode {
        GatingMode::Block => {
            "Request blocked due to critical coherence levels. Human intervention required."
        }
        GatingMode::Slow => {
            "Slow mode activated. Response will include grounding and additional safety measures."
        }
        GatingMode::DeferToHuman => {
            "This request should be reviewed by a human before responding."
        }
        GatingMode::Normal => "Normal processing - coherence within acceptable range.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision(mode: GatingMode) -> GatingDecision {
        GatingDecision {
            mode,
            reasons: vec![],
            interventions: vec![],
        }
    }

    #[test]
    fn explain_gives_each_mode_a_distinct_summary() {
        let modes = [
            GatingMode::Normal,
            GatingMode::Slow,
            GatingMode::DeferToHuman,
            GatingMode::Block,
        ];
        let summaries: Vec<&str> = modes.iter().map(|m| explain(&decision(*m))).collect();
        for (i, a) in summaries.iter().enumerate() {
            for b in &summaries[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(explain(&decision(GatingMode::Block)).contains("Human intervention required"));
    }
}
