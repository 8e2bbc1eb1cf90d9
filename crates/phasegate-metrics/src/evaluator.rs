// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic coherence scoring.
//!
//! Three bounded signals (emotional load, cognitive complexity, contextual
//! pressure) combine into `delta_theta`; `wobble` measures the spread
//! between the first two, and `phi_index` is their inverse blend. Every
//! scalar is clamped into its documented range, so the evaluator is total
//! over arbitrary input.

use std::sync::LazyLock;

use regex::Regex;

use phasegate_config::PolicyConfig;
use phasegate_core::types::{CoherenceMetrics, CoherenceState, RequestContext};

/// High-intensity emotional markers (substring match on lowercased text).
const HIGH_INTENSITY: &[&str] = &[
    "scared", "terrified", "panic", "crisis", "emergency", "dying", "death",
    "trauma", "abuse", "suicide", "hopeless", "desperate", "anguish", "devastated",
];

/// Medium-intensity emotional markers.
const MEDIUM_INTENSITY: &[&str] = &[
    "worried", "anxious", "concerned", "upset", "sad", "angry", "frustrated",
    "confused", "hurt", "pain", "fear", "stress", "overwhelmed",
];

/// Low-intensity emotional markers.
const LOW_INTENSITY: &[&str] = &[
    "wondering", "curious", "uncertain", "hope", "wish", "prefer", "dislike",
];

/// Medical/technical terminology contributing to complexity.
const TECHNICAL_TERMS: &[&str] = &[
    "diagnosis", "prognosis", "genetic", "mutation", "syndrome", "therapy",
    "treatment", "medication", "protocol", "clinical", "pathology", "symptom",
    "disorder", "condition", "chromosome",
];

/// Context tags that raise contextual pressure.
const CRITICAL_TAGS: &[&str] = &["emergency", "urgent", "critical", "acute", "crisis"];

static CONJUNCTIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(and|but|however|although|because|therefore|while)\b").unwrap()
});

static MULTI_QUESTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\?\?+").unwrap());

static BAND_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(pain|symptom|physical|body|heart rate|hrv|sleep|fatigue|energy)\b").unwrap()
});

static BAND_EMOTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(feel|emotion|scared|worried|happy|sad|angry|anxious)\b").unwrap()
});

static BAND_PURPOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(meaning|purpose|why|understand|integrate|connect|whole)\b").unwrap()
});

/// Computes coherence metrics for one request.
///
/// Deterministic for identical `(text, context)` pairs. Never fails:
/// empty and arbitrarily long text both produce clamped, in-range values.
/// `state` is classified against the default policy thresholds; the gating
/// engine re-applies its own (possibly overridden) thresholds
/// independently, so the two classifications may diverge under overrides.
pub fn evaluate(text: &str, context: Option<&RequestContext>) -> CoherenceMetrics {
    let lower = text.to_lowercase();

    let emotional = emotional_load(text, &lower);
    let complexity = complexity(text, &lower);
    let pressure = contextual_pressure(context);

    let delta_theta = clamp01(0.4 * emotional + 0.3 * complexity + 0.3 * pressure);
    let wobble = clamp01((emotional - complexity).abs());
    let phi_index = clamp01(1.0 - (0.7 * delta_theta + 0.3 * wobble));

    CoherenceMetrics {
        delta_theta,
        wobble,
        phi_index,
        state: classify_state(delta_theta, &PolicyConfig::default()),
        dimension_band: dimension_band(&lower).to_string(),
        confidence: confidence(text, context),
    }
}

/// Classifies `delta_theta` into the highest band whose threshold it has
/// met or exceeded, defaulting to coherent below every threshold.
pub fn classify_state(delta_theta: f64, policy: &PolicyConfig) -> CoherenceState {
    if delta_theta >= policy.critical_threshold {
        CoherenceState::Critical
    } else if delta_theta >= policy.unstable_threshold {
        CoherenceState::Unstable
    } else if delta_theta >= policy.borderline_threshold {
        CoherenceState::Borderline
    } else {
        CoherenceState::Coherent
    }
}

fn emotional_load(text: &str, lower: &str) -> f64 {
    let mut score = 0.0;

    for word in HIGH_INTENSITY {
        if lower.contains(word) {
            score += 0.3;
        }
    }
    for word in MEDIUM_INTENSITY {
        if lower.contains(word) {
            score += 0.15;
        }
    }
    for word in LOW_INTENSITY {
        if lower.contains(word) {
            score += 0.05;
        }
    }

    // Punctuation intensity: exclamation marks and stacked question marks.
    let exclamations = text.matches('!').count();
    let multi_questions = MULTI_QUESTION.find_iter(text).count();
    score += f64::min(0.2, (exclamations + multi_questions) as f64 * 0.05);

    clamp01(score)
}

fn complexity(text: &str, lower: &str) -> f64 {
    let word_count = text.split_whitespace().count();
    let length_score = f64::min(1.0, word_count as f64 / 100.0);

    let mut technical = 0.0;
    for term in TECHNICAL_TERMS {
        if lower.contains(term) {
            technical += 0.1;
        }
    }

    let conjunctions = CONJUNCTIONS.find_iter(text).count();
    let structure = f64::min(0.3, conjunctions as f64 * 0.05);

    clamp01(0.4 * length_score + 0.4 * f64::min(technical, 0.5) + 0.2 * structure)
}

fn contextual_pressure(context: Option<&RequestContext>) -> f64 {
    let Some(ctx) = context else {
        return 0.0;
    };

    let mut pressure = 0.0;

    if let Some(patient) = &ctx.patient_meta {
        pressure += 0.2;
        if patient.age.is_some_and(|age| age < 5) {
            pressure += 0.1;
        }
        if patient.diagnoses.len() > 2 {
            pressure += 0.1;
        }
        if !patient.flags.is_empty() {
            pressure += 0.15;
        }
    }

    if ctx.history.len() > 5 {
        pressure += 0.1;
    }

    for tag in CRITICAL_TAGS {
        if ctx.tags.iter().any(|t| t == tag) {
            pressure += 0.2;
        }
    }

    clamp01(pressure)
}

/// Assigns a dimension band: L1 body, L2 emotion, L3 meaning (default),
/// L4 purpose. First matching class wins.
fn dimension_band(lower: &str) -> &'static str {
    if BAND_BODY.is_match(lower) {
        "L1"
    } else if BAND_EMOTION.is_match(lower) {
        "L2"
    } else if BAND_PURPOSE.is_match(lower) {
        "L4"
    } else {
        "L3"
    }
}

/// Confidence grows with input length and context richness.
fn confidence(text: &str, context: Option<&RequestContext>) -> f64 {
    let mut confidence = 0.5;

    if text.len() > 50 {
        confidence += 0.1;
    }
    if text.len() > 100 {
        confidence += 0.1;
    }

    if let Some(ctx) = context {
        if !ctx.history.is_empty() {
            confidence += 0.1;
        }
        if ctx.patient_meta.is_some() {
            confidence += 0.1;
        }
        if ctx.signals.is_some() {
            confidence += 0.1;
        }
    }

    clamp01(confidence)
}

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
