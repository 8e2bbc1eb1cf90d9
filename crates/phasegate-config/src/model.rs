// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Phasegate middleware.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Phasegate configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PhasegateConfig {
    /// HTTP server bind settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Gating policy thresholds. Read-only process-wide defaults; callers
    /// may override parts of them per request.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Generative-text backend settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8600
}

/// Gating policy thresholds. Strictly ascending:
/// `borderline < unstable < critical`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Block at or above this delta_theta.
    #[serde(default = "default_critical_threshold")]
    pub critical_threshold: f64,

    /// Slow mode at or above this delta_theta.
    #[serde(default = "default_unstable_threshold")]
    pub unstable_threshold: f64,

    /// Monitor at or above this delta_theta.
    #[serde(default = "default_borderline_threshold")]
    pub borderline_threshold: f64,

    /// Add a disclaimer intervention in slow mode when phi_index falls
    /// below this value.
    #[serde(default = "default_require_grounding_below_phi")]
    pub require_grounding_below_phi: f64,

    /// Policy flag carried for callers that review medical traffic; the
    /// decision engine itself does not consume it.
    #[serde(default)]
    pub require_human_for_medical: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            critical_threshold: default_critical_threshold(),
            unstable_threshold: default_unstable_threshold(),
            borderline_threshold: default_borderline_threshold(),
            require_grounding_below_phi: default_require_grounding_below_phi(),
            require_human_for_medical: false,
        }
    }
}

fn default_critical_threshold() -> f64 {
    0.8
}

fn default_unstable_threshold() -> f64 {
    0.55
}

fn default_borderline_threshold() -> f64 {
    0.3
}

fn default_require_grounding_below_phi() -> f64 {
    0.5
}

/// Generative-text backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// API key. `None` requires the environment variable override.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the chat-completions endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Default model when the request supplies no preference.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Fallback model for the single router retry. `None` disables the
    /// fallback chain.
    #[serde(default)]
    pub fallback_model: Option<String>,

    /// Default maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Default sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Request timeout in seconds. Hardening only; not part of the
    /// routing contract.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            default_model: default_model(),
            fallback_model: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> u32 {
    800
}

fn default_temperature() -> f64 {
    0.4
}

fn default_timeout_secs() -> u64 {
    120
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds_are_ascending() {
        let policy = PolicyConfig::default();
        assert!(policy.borderline_threshold < policy.unstable_threshold);
        assert!(policy.unstable_threshold < policy.critical_threshold);
    }

    #[test]
    fn default_policy_matches_documented_values() {
        let policy = PolicyConfig::default();
        assert_eq!(policy.critical_threshold, 0.8);
        assert_eq!(policy.unstable_threshold, 0.55);
        assert_eq!(policy.borderline_threshold, 0.3);
        assert_eq!(policy.require_grounding_below_phi, 0.5);
        assert!(!policy.require_human_for_medical);
    }

    #[test]
    fn default_backend_parameters() {
        let backend = BackendConfig::default();
        assert_eq!(backend.default_model, "gpt-4o");
        assert_eq!(backend.max_tokens, 800);
        assert_eq!(backend.temperature, 0.4);
        assert!(backend.fallback_model.is_none());
    }
}
