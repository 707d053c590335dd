//! Centralized client configuration.
//!
//! This module provides strongly-typed configuration for the client,
//! loaded via the `config` crate from environment variables prefixed with
//! `PINGSTER_`. Nested keys use `__`, e.g. `PINGSTER_BACKEND__PROJECT_ID`.

use serde::Deserialize;

/// Client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Backend connection settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Largest image attachment accepted, in bytes.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
}

/// Backend connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Project the client connects to.
    #[serde(default = "default_project_id")]
    pub project_id: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_max_image_bytes() -> usize {
    1024 * 1024
}

fn default_project_id() -> String {
    "pingster-local".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            project_id: default_project_id(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            log_filter: default_log_filter(),
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("PINGSTER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
