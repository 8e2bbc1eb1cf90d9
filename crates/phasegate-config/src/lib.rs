// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Phasegate middleware.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides via the `PHASEGATE_` prefix.
//!
//! # Usage
//!
//! ```no_run
//! let config = phasegate_config::load_and_validate().expect("config errors");
//! println!("listening on {}:{}", config.server.host, config.server.port);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{BackendConfig, LogConfig, PhasegateConfig, PolicyConfig, ServerConfig};
pub use validation::validate_config;

use phasegate_core::PhasegateError;

/// Load configuration from the XDG hierarchy and validate it.
///
/// Loads TOML files plus env vars via Figment, then runs
/// post-deserialization validation (ascending thresholds, sane ranges).
pub fn load_and_validate() -> Result<PhasegateConfig, PhasegateError> {
    let config = loader::load_config()
        .map_err(|e| PhasegateError::Config(e.to_string()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<PhasegateConfig, PhasegateError> {
    let config = loader::load_config_from_str(toml_content)
        .map_err(|e| PhasegateError::Config(e.to_string()))?;
    validation::validate_config(&config)?;
    Ok(config)
}
