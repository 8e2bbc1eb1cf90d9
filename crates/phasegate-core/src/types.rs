// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Phasegate pipeline.
//!
//! Everything here is immutable once produced: metrics are computed once per
//! request, safety flags are read-only after screening, and a gating decision
//! is terminal for its request.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a conversation session; stable across turns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generates a fresh session identifier.
    pub fn generate() -> Self {
        SessionId(format!("session-{}", uuid::Uuid::new_v4()))
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlation identifier minted once per request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceId(pub String);

impl TraceId {
    /// Generates a fresh trace identifier.
    pub fn generate() -> Self {
        TraceId(format!("trace-{}", uuid::Uuid::new_v4()))
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coherence state classified from `delta_theta` against ascending
/// thresholds. The highest band whose threshold the metric has met or
/// exceeded wins; below every threshold the state is `Coherent`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CoherenceState {
    Coherent,
    Borderline,
    Unstable,
    Critical,
}

/// Per-request coherence metrics. Created once by the metrics evaluator,
/// consumed by the gating engine, and echoed verbatim in the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoherenceMetrics {
    /// Tension/misalignment measure. Non-negative; policy thresholds sit
    /// below 1.0.
    pub delta_theta: f64,
    /// Oscillatory instability. Carried through but not gating-determinative.
    pub wobble: f64,
    /// Coherence/proximity score in [0, 1]. Low values warrant extra
    /// grounding even outside the unstable band.
    pub phi_index: f64,
    /// Classification of `delta_theta` against the default thresholds.
    pub state: CoherenceState,
    /// Free-form dimension tag (L1 body, L2 emotion, L3 meaning, L4 purpose).
    pub dimension_band: String,
    /// Confidence in the classification, in [0, 1].
    pub confidence: f64,
}

/// Safety categories raised by the pattern screener.
///
/// Output order is rule-evaluation order, not severity order; the severity
/// rank is used only to pick the most urgent applicable disclaimer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SafetyFlag {
    SelfHarm,
    Violence,
    LegalRisk,
    MedicalHighStakes,
    ChildSafety,
    Emergency,
    ExperimentalTreatment,
    PrivacyConcern,
}

impl SafetyFlag {
    /// Severity rank for disclaimer selection; higher is more urgent.
    pub fn severity(self) -> u8 {
        match self {
            SafetyFlag::SelfHarm | SafetyFlag::Emergency => 4,
            SafetyFlag::ChildSafety => 3,
            SafetyFlag::Violence => 2,
            SafetyFlag::MedicalHighStakes | SafetyFlag::LegalRisk => 1,
            SafetyFlag::ExperimentalTreatment | SafetyFlag::PrivacyConcern => 0,
        }
    }
}

/// How the pipeline handles a request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GatingMode {
    /// Proceed unmodified.
    Normal,
    /// Proceed with an applied grounding intervention.
    Slow,
    /// Reserved for human-review flows; never produced by the decision
    /// engine itself.
    DeferToHuman,
    /// Short-circuit with the fixed escalation message; the router is
    /// never invoked.
    Block,
}

/// A named, independently toggleable request modification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InterventionKind {
    Grounding,
    Disclaimer,
    Handoff,
}

/// One intervention recorded on a gating decision. `applied = false`
/// entries are kept for observability even though no action is taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    #[serde(rename = "type")]
    pub kind: InterventionKind,
    pub applied: bool,
    pub note: String,
}

/// Terminal output of the gating decision engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatingDecision {
    pub mode: GatingMode,
    pub reasons: Vec<String>,
    pub interventions: Vec<Intervention>,
}

impl GatingDecision {
    /// True when the request must short-circuit without routing.
    pub fn is_blocked(&self) -> bool {
        self.mode == GatingMode::Block
    }

    /// Returns the first applied intervention of the given kind, if any.
    pub fn applied(&self, kind: InterventionKind) -> Option<&Intervention> {
        self.interventions
            .iter()
            .find(|i| i.kind == kind && i.applied)
    }
}

/// Caller-supplied partial policy override for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatingOverrides {
    /// Forces slow mode, bypassing every metric-based check.
    pub slow_mode: bool,
    /// Per-request ceiling replacing the policy critical threshold.
    pub max_delta_theta: Option<f64>,
    /// Forces the clinical answer style.
    pub require_clinical_tone: bool,
    /// Preferred answer language (defaults to "en").
    pub language: Option<String>,
}

/// Model selection and sampling preferences for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPrefs {
    pub primary_model: Option<String>,
    pub fallback_model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

/// Token counts reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt: u32,
    pub completion: u32,
}

/// Result of a routed (non-streaming) model call. `model` names whichever
/// backend actually served the request, primary or fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingOutcome {
    pub text: String,
    pub model: String,
    pub tokens: TokenUsage,
    pub latency_ms: u64,
}

/// One prior conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: String,
    pub content: String,
}

/// Clinical metadata attached to a request context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientMeta {
    pub patient_id: Option<String>,
    pub age: Option<u32>,
    pub diagnoses: Vec<String>,
    pub flags: Vec<String>,
}

/// Physiological/environmental signals carried alongside a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Signals {
    pub hrv: Option<f64>,
    pub uv_index: Option<f64>,
}

/// Optional conversational context accompanying a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestContext {
    /// Originating channel (guardian, clinic, esp_lab, econ, ...).
    pub channel: Option<String>,
    /// Prior turns, oldest first.
    pub history: Vec<HistoryTurn>,
    /// Free-form tags; some ("emergency", "urgent", ...) raise pressure.
    pub tags: Vec<String>,
    pub patient_meta: Option<PatientMeta>,
    pub signals: Option<Signals>,
}

/// Answer tone recorded on the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AnswerStyle {
    Clinical,
    Conversational,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coherence_state_serializes_lowercase() {
        let json = serde_json::to_string(&CoherenceState::Borderline).unwrap();
        assert_eq!(json, "\"borderline\"");
        let back: CoherenceState = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(back, CoherenceState::Critical);
    }

    #[test]
    fn safety_flag_serializes_snake_case() {
        let json = serde_json::to_string(&SafetyFlag::SelfHarm).unwrap();
        assert_eq!(json, "\"self_harm\"");
        assert_eq!(SafetyFlag::MedicalHighStakes.to_string(), "medical_high_stakes");
    }

    #[test]
    fn gating_mode_ordering_matches_escalation() {
        assert!(GatingMode::Normal < GatingMode::Slow);
        assert!(GatingMode::Slow < GatingMode::Block);
    }

    #[test]
    fn metrics_round_trip_through_serde() {
        let metrics = CoherenceMetrics {
            delta_theta: 0.42,
            wobble: 0.1,
            phi_index: 0.67,
            state: CoherenceState::Borderline,
            dimension_band: "L2".to_string(),
            confidence: 0.7,
        };
        let json = serde_json::to_string(&metrics).unwrap();
        let back: CoherenceMetrics = serde_json::from_str(&json).unwrap();
        assert_eq!(back, metrics);
    }

    #[test]
    fn intervention_kind_serializes_as_type_field() {
        let i = Intervention {
            kind: InterventionKind::Grounding,
            applied: true,
            note: "added grounding preamble".to_string(),
        };
        let json = serde_json::to_value(&i).unwrap();
        assert_eq!(json["type"], "grounding");
        assert_eq!(json["applied"], true);
    }

    #[test]
    fn overrides_default_from_empty_object() {
        let o: GatingOverrides = serde_json::from_str("{}").unwrap();
        assert!(!o.slow_mode);
        assert!(o.max_delta_theta.is_none());
    }

    #[test]
    fn context_deserializes_with_partial_fields() {
        let json = r#"{"channel": "clinic", "patient_meta": {"age": 7}}"#;
        let ctx: RequestContext = serde_json::from_str(json).unwrap();
        assert_eq!(ctx.channel.as_deref(), Some("clinic"));
        assert_eq!(ctx.patient_meta.unwrap().age, Some(7));
        assert!(ctx.history.is_empty());
    }

    #[test]
    fn severity_ranks_self_harm_highest() {
        assert!(SafetyFlag::SelfHarm.severity() > SafetyFlag::ChildSafety.severity());
        assert!(SafetyFlag::ChildSafety.severity() > SafetyFlag::Violence.severity());
        assert!(SafetyFlag::Violence.severity() > SafetyFlag::LegalRisk.severity());
    }

    #[test]
    fn trace_and_session_ids_carry_prefixes() {
        assert!(TraceId::generate().0.starts_with("trace-"));
        assert!(SessionId::generate().0.starts_with("session-"));
    }
}
