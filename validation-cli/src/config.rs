//! Layered CLI configuration
//!
//! Sources, lowest precedence first: built-in defaults, the optional
//! `--config` file, then `RUSTCARE_VALIDATION__*` environment variables
//! (`__` separates nested keys, e.g. `RUSTCARE_VALIDATION__VALIDATOR__MAX_DEPTH=8`).

use anyhow::{Context, Result};
use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};
use std::path::Path;
use validation_engine::ValidatorConfig;

pub const ENV_PREFIX: &str = "RUSTCARE_VALIDATION";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Log filter used when neither `RUST_LOG` nor `--verbose` is given
    pub log_level: String,
    pub validator: ValidatorConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            validator: ValidatorConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from the optional file and the process environment.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing or unreadable, or when a value has the
    /// wrong shape (e.g. a non-numeric `max_depth`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Same as [`CliConfig::load`], reading variables from `vars` instead of
    /// the process environment when given.
    ///
    /// # Errors
    ///
    /// See [`CliConfig::load`].
    pub fn load_with_env(path: Option<&Path>, vars: Option<Map<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(vars),
            )
            .build()
            .with_context(|| match path {
                Some(path) => format!("Failed to load configuration from {}", path.display()),
                None => "Failed to load configuration".to_string(),
            })?;

        settings
            .try_deserialize()
            .context("Configuration has invalid values")
    }
}
