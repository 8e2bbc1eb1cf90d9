// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, most importantly the strictly ascending gating thresholds.

use phasegate_core::PhasegateError;

use crate::model::PhasegateConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every violation before returning so a bad config file is
/// reported in full.
pub fn validate_config(config: &PhasegateConfig) -> Result<(), PhasegateError> {
    let mut errors = Vec::new();

    let policy = &config.policy;
    if !(policy.borderline_threshold < policy.unstable_threshold
        && policy.unstable_threshold < policy.critical_threshold)
    {
        errors.push(format!(
            "policy thresholds must be strictly ascending: borderline={} unstable={} critical={}",
            policy.borderline_threshold, policy.unstable_threshold, policy.critical_threshold
        ));
    }

    if policy.borderline_threshold < 0.0 {
        errors.push(format!(
            "policy.borderline_threshold must be non-negative, got {}",
            policy.borderline_threshold
        ));
    }

    if !(0.0..=1.0).contains(&policy.require_grounding_below_phi) {
        errors.push(format!(
            "policy.require_grounding_below_phi must be in [0, 1], got {}",
            policy.require_grounding_below_phi
        ));
    }

    if config.server.host.trim().is_empty() {
        errors.push("server.host must not be empty".to_string());
    }

    if config.server.port == 0 {
        errors.push("server.port must be non-zero".to_string());
    }

    if config.backend.max_tokens == 0 {
        errors.push("backend.max_tokens must be non-zero".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(PhasegateError::Config(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PhasegateConfig;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&PhasegateConfig::default()).is_ok());
    }

    #[test]
    fn rejects_non_ascending_thresholds() {
        let mut config = PhasegateConfig::default();
        config.policy.unstable_threshold = 0.9; // above critical (0.8)
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("strictly ascending"));
    }

    #[test]
    fn rejects_phi_threshold_out_of_range() {
        let mut config = PhasegateConfig::default();
        config.policy.require_grounding_below_phi = 1.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_zero_port_and_reports_all_errors() {
        let mut config = PhasegateConfig::default();
        config.server.port = 0;
        config.backend.max_tokens = 0;
        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("server.port"));
        assert!(err.contains("backend.max_tokens"));
    }
}
