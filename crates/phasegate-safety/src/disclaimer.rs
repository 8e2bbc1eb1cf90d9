// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Disclaimer selection from safety flags.
//!
//! When several flags co-occur, the most severe one wins. The ordering
//! (self_harm/emergency > child_safety > violence > medical/legal >
//! generic) follows [`SafetyFlag::severity`].

use phasegate_core::types::SafetyFlag;

const EMERGENCY_DISCLAIMER: &str = "\u{26a0}\u{fe0f} If you or someone you know is in immediate \
     danger or experiencing a medical emergency, please call 911 or your local emergency \
     services immediately.";

const CHILD_SAFETY_DISCLAIMER: &str = "\u{26a0}\u{fe0f} If a child may be unsafe, contact your \
     local child protection services or emergency services right away.";

const VIOLENCE_DISCLAIMER: &str = "\u{26a0}\u{fe0f} If anyone is at risk of being harmed, \
     contact your local emergency services immediately.";

const MEDICAL_DISCLAIMER: &str = "\u{26a0}\u{fe0f} This response is for informational purposes \
     only and is not medical advice. Please consult with a qualified healthcare provider for \
     medical decisions.";

const LEGAL_DISCLAIMER: &str = "\u{26a0}\u{fe0f} This response is for informational purposes \
     only and is not legal advice. Please consult with a qualified attorney for legal matters.";

const GENERIC_DISCLAIMER: &str = "\u{26a0}\u{fe0f} Please use this information responsibly and \
     consult appropriate professionals as needed.";

/// Picks the disclaimer for the most urgent applicable flag, or `None`
/// when no flags were raised.
pub fn disclaimer_for(flags: &[SafetyFlag]) -> Option<&'static str> {
    if flags.is_empty() {
        return None;
    }

    let has = |flag: SafetyFlag| flags.contains(&flag);

    if has(SafetyFlag::SelfHarm) || has(SafetyFlag::Emergency) {
        Some(EMERGENCY_DISCLAIMER)
    } else if has(SafetyFlag::ChildSafety) {
        Some(CHILD_SAFETY_DISCLAIMER)
    } else if has(SafetyFlag::Violence) {
        Some(VIOLENCE_DISCLAIMER)
    } else if has(SafetyFlag::MedicalHighStakes) {
        Some(MEDICAL_DISCLAIMER)
    } else if has(SafetyFlag::LegalRisk) {
        Some(LEGAL_DISCLAIMER)
    } else {
        Some(GENERIC_DISCLAIMER)
    }
}
