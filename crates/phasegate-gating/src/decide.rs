// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The gating decision algorithm.
//!
//! Strict priority order, first matching rule wins:
//! 1. forced slow mode override
//! 2. critical state or delta_theta at/above the effective critical threshold
//! 3. unstable state or delta_theta at/above the unstable threshold
//! 4. borderline state
//! 5. coherent
//!
//! A request eligible for both the critical and unstable rules always
//! resolves to block, never slow.

use phasegate_config::PolicyConfig;
use phasegate_core::types::{
    CoherenceMetrics, CoherenceState, GatingDecision, GatingMode, GatingOverrides, Intervention,
    InterventionKind,
};

/// Fixed response text for blocked requests. Never replaced by model
/// output and never enriched with error detail.
pub const ESCALATION_MESSAGE: &str = "This request requires human intervention. Please consult \
     with a healthcare provider or appropriate professional.";

/// Decides how a request is handled.
///
/// `overrides.max_delta_theta` replaces the policy critical threshold for
/// this request only; `overrides.slow_mode` bypasses every metric-based
/// check so a calling application can force caution regardless of the
/// computed coherence.
pub fn decide(
    metrics: &CoherenceMetrics,
    policy: &PolicyConfig,
    overrides: Option<&GatingOverrides>,
) -> GatingDecision {
    if overrides.is_some_and(|o| o.slow_mode) {
        return GatingDecision {
            mode: GatingMode::Slow,
            reasons: vec!["slow_mode_override".to_string()],
            interventions: vec![Intervention {
                kind: InterventionKind::Grounding,
                applied: true,
                note: "Slow mode activated by client request".to_string(),
            }],
        };
    }

    let effective_critical = overrides
        .and_then(|o| o.max_delta_theta)
        .unwrap_or(policy.critical_threshold);

    if metrics.state == CoherenceState::Critical || metrics.delta_theta >= effective_critical {
        return GatingDecision {
            mode: GatingMode::Block,
            reasons: vec![
                "delta_theta_critical".to_string(),
                format!("delta_theta={:.2}", metrics.delta_theta),
            ],
            interventions: vec![Intervention {
                kind: InterventionKind::Handoff,
                applied: true,
                note: "Coherence critically low - requires human intervention".to_string(),
            }],
        };
    }

    if metrics.state == CoherenceState::Unstable
        || metrics.delta_theta >= policy.unstable_threshold
    {
        let mut reasons = vec![
            "delta_theta_high".to_string(),
            format!("delta_theta={:.2}", metrics.delta_theta),
        ];
        let mut interventions = vec![Intervention {
            kind: InterventionKind::Grounding,
            applied: true,
            note: "Added grounding preamble to stabilize response".to_string(),
        }];

        // Low coherence compounds instability: add a disclaimer without
        // escalating the mode itself.
        if metrics.phi_index < policy.require_grounding_below_phi {
            reasons.push("phi_index_low".to_string());
            interventions.push(Intervention {
                kind: InterventionKind::Disclaimer,
                applied: true,
                note: "Added clinical disclaimer due to low coherence".to_string(),
            });
        }

        return GatingDecision {
            mode: GatingMode::Slow,
            reasons,
            interventions,
        };
    }

    if metrics.state == CoherenceState::Borderline {
        return GatingDecision {
            mode: GatingMode::Normal,
            reasons: vec![
                "delta_theta_moderate".to_string(),
                format!("delta_theta={:.2}", metrics.delta_theta),
            ],
            interventions: vec![Intervention {
                kind: InterventionKind::Grounding,
                applied: false,
                note: "Not needed; state borderline but acceptable".to_string(),
            }],
        };
    }

    GatingDecision {
        mode: GatingMode::Normal,
        reasons: vec![
            "coherent".to_string(),
            format!("delta_theta={:.2}", metrics.delta_theta),
            format!("phi_index={:.2}", metrics.phi_index),
        ],
        interventions: vec![Intervention {
            kind: InterventionKind::Grounding,
            applied: false,
            note: "Not needed; state coherent".to_string(),
        }],
    }
}
