// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat message assembly from the request context.

use phasegate_core::types::RequestContext;
use phasegate_core::ChatMessage;

const BASE_PROMPT: &str = "You are a coherence-aware middleware assistant, designed to provide coherent, grounded, and contextually appropriate responses.";

/// Builds the message array sent to the backend: one system message derived
/// from the context, prior history turns in order, then the current input.
pub fn build_messages(input: &str, context: Option<&RequestContext>) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(build_system_prompt(context))];

    if let Some(ctx) = context {
        for turn in &ctx.history {
            messages.push(ChatMessage {
                role: turn.role.clone(),
                content: turn.content.clone(),
            });
        }
    }

    messages.push(ChatMessage::user(input));
    messages
}

fn build_system_prompt(context: Option<&RequestContext>) -> String {
    let mut prompt = String::from(BASE_PROMPT);

    let Some(ctx) = context else {
        return prompt;
    };

    if ctx.patient_meta.is_some() {
        prompt.push_str("\n\nYou are operating in a clinical context. Provide responses that are:");
        prompt.push_str("\n- Clear and medically accurate");
        prompt.push_str("\n- Compassionate and family-appropriate");
        prompt.push_str("\n- Evidence-based when possible");
        prompt.push_str("\n- Honest about uncertainty");
        prompt.push_str(
            "\n\nIMPORTANT: You are not replacing clinical judgment. Your role is to help explain and clarify.",
        );
    }

    match ctx.channel.as_deref() {
        Some("guardian") => {
            prompt.push_str("\n\nChannel: Guardian (family support)");
            prompt.push_str("\nTone: Warm, supportive, clear");
        }
        Some("clinic") => {
            prompt.push_str("\n\nChannel: Clinical");
            prompt.push_str("\nTone: Professional, precise, compassionate");
        }
        Some("esp_lab") => {
            prompt.push_str("\n\nChannel: ESP Research");
            prompt.push_str("\nTone: Scientific, curious, open");
        }
        Some("econ") => {
            prompt.push_str("\n\nChannel: Economic modeling");
            prompt.push_str("\nTone: Analytical, structured");
        }
        _ => {}
    }

    prompt
}
