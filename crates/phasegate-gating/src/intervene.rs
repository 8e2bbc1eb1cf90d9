// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt rewriting driven by an existing gating decision.
//!
//! Pure text concatenation: an applied grounding intervention prepends the
//! fixed preamble, an applied disclaimer appends one of two fixed suffixes.
//! Both are independent and additive.

use phasegate_core::types::{GatingDecision, InterventionKind, RequestContext};

/// Fixed preamble inserted before the user's prompt to induce a measured,
/// non-speculative response.
const GROUNDING_PREAMBLE: &str = "\nBefore answering, take a moment to ground yourself:\n\
1. This is a request that requires careful, measured response\n\
2. Focus on clarity and compassion\n\
3. Avoid speculation; stay with what is known\n\n\
Now, addressing the question:\n";

const CLINICAL_DISCLAIMER_SUFFIX: &str = "\n\n[This response is for informational purposes. \
     Clinical decisions should be made in consultation with healthcare providers.]";

const GENERAL_DISCLAIMER_SUFFIX: &str =
    "\n\n[This response is for informational purposes only.]";

/// Applies the decision's interventions to the outbound prompt.
///
/// Idempotent with respect to its inputs: the same prompt and decision
/// always yield the same string.
pub fn apply_interventions(
    prompt: &str,
    decision: &GatingDecision,
    context: Option<&RequestContext>,
) -> String {
    let mut modified = prompt.to_string();

    if decision.applied(InterventionKind::Grounding).is_some() {
        modified = format!("{GROUNDING_PREAMBLE}{modified}");
    }

    if decision.applied(InterventionKind::Disclaimer).is_some() {
        let suffix = if context.is_some_and(|c| c.patient_meta.is_some()) {
            CLINICAL_DISCLAIMER_SUFFIX
        } else {
            GENERAL_DISCLAIMER_SUFFIX
        };
        modified.push_str(suffix);
    }

    modified
}
