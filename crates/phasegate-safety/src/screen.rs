// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Safety rules evaluated against lowercased input text.
//!
//! Each rule fires independently; a single input may raise zero, one, or
//! many flags. Output order is rule-evaluation order, not severity order.

use std::sync::LazyLock;

use regex::Regex;

use phasegate_core::types::{RequestContext, SafetyFlag};

/// Age below which the minor-safety rule is eligible to fire.
const MAJORITY_AGE: u32 = 18;

static SELF_HARM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(suicide|kill myself|end my life|want to die|hurt myself)\b").unwrap()
});

static VIOLENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(kill|murder|harm|hurt|attack)\s+(someone|them|him|her|others)\b").unwrap()
});

static LEGAL_RISK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(lawsuit|sue|attorney|lawyer|legal action|malpractice)\b").unwrap()
});

static MEDICAL_DOSING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(prescribe|prescription|dose|dosage|medication|mg|ml)\b").unwrap()
});

static CHILD_SAFETY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(abuse|neglect|danger|unsafe|threatened)\b").unwrap()
});

static EMERGENCY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(emergency|911|urgent|immediate|critical|dying)\b").unwrap()
});

static EXPERIMENTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(experimental|unapproved|off-label|miracle cure|alternative treatment)\b")
        .unwrap()
});

static PRIVACY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(ssn|social security|credit card|password|patient id)\b").unwrap()
});

/// Runs every safety rule against the input text.
///
/// Context-gated rules (medical dosing, minor safety) fire only when the
/// relevant context field is present; an absent or partial context simply
/// means those rules do not fire.
pub fn screen(text: &str, context: Option<&RequestContext>) -> Vec<SafetyFlag> {
    let lower = text.to_lowercase();
    let mut flags = Vec::new();

    if SELF_HARM.is_match(&lower) {
        flags.push(SafetyFlag::SelfHarm);
    }

    if VIOLENCE.is_match(&lower) {
        flags.push(SafetyFlag::Violence);
    }

    if LEGAL_RISK.is_match(&lower) {
        flags.push(SafetyFlag::LegalRisk);
    }

    let patient = context.and_then(|c| c.patient_meta.as_ref());

    if patient.is_some() && MEDICAL_DOSING.is_match(&lower) {
        flags.push(SafetyFlag::MedicalHighStakes);
    }

    let is_minor = patient
        .and_then(|p| p.age)
        .is_some_and(|age| age < MAJORITY_AGE);
    if is_minor && CHILD_SAFETY.is_match(&lower) {
        flags.push(SafetyFlag::ChildSafety);
    }

    if EMERGENCY.is_match(&lower) {
        flags.push(SafetyFlag::Emergency);
    }

    if EXPERIMENTAL.is_match(&lower) {
        flags.push(SafetyFlag::ExperimentalTreatment);
    }

    if PRIVACY.is_match(&lower) {
        flags.push(SafetyFlag::PrivacyConcern);
    }

    flags
}
