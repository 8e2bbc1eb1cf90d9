// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./phasegate.toml` >
//! `~/.config/phasegate/phasegate.toml` > `/etc/phasegate/phasegate.toml`
//! with environment variable overrides via the `PHASEGATE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PhasegateConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/phasegate/phasegate.toml` (system-wide)
/// 3. `~/.config/phasegate/phasegate.toml` (user XDG config)
/// 4. `./phasegate.toml` (local directory)
/// 5. `PHASEGATE_*` environment variables
pub fn load_config() -> Result<PhasegateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PhasegateConfig::default()))
        .merge(Toml::file("/etc/phasegate/phasegate.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("phasegate/phasegate.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("phasegate.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<PhasegateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PhasegateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PhasegateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PhasegateConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so underscore-containing
/// key names stay unambiguous: `PHASEGATE_BACKEND_DEFAULT_MODEL` must map to
/// `backend.default_model`, not `backend.default.model`.
fn env_provider() -> Env {
    Env::prefixed("PHASEGATE_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("policy_", "policy.", 1)
            .replacen("backend_", "backend.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8600);
        assert_eq!(config.policy.critical_threshold, 0.8);
    }

    #[test]
    fn toml_overrides_defaults() {
        let toml = r#"
[server]
port = 9000

[policy]
critical_threshold = 0.9

[backend]
default_model = "gpt-4o-mini"
fallback_model = "backup-1"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.policy.critical_threshold, 0.9);
        assert_eq!(config.backend.default_model, "gpt-4o-mini");
        assert_eq!(config.backend.fallback_model.as_deref(), Some("backup-1"));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let toml = r#"
[policy]
critical_treshold = 0.9
"#;
        let err = load_config_from_str(toml).expect_err("should reject unknown field");
        let msg = err.to_string();
        assert!(
            msg.contains("unknown field") || msg.contains("critical_treshold"),
            "got: {msg}"
        );
    }
}
