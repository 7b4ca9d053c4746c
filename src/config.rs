//! Configuration System
//!
//! Layered configuration built on the `config` crate. The same store carries the
//! application settings (logging, which providers are enabled) and the
//! per-language formatting preferences read by the language settings provider.

use crate::logging::LoggingConfig;
use crate::provider::LanguageSettingsStore;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::{ConfigLoader, LoadedConfig};
pub use merge::merge_policy::ENV_PREFIX;
pub use sources::workspace_file::WORKSPACE_CONFIG_DIR;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileSettingsConfig {
    /// Built-in providers to register
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Toggles for the built-in providers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Per-language preferences from the configuration store
    #[serde(default = "default_true")]
    pub language_store: bool,

    /// `.editorconfig` files next to and above the edited file
    #[serde(default = "default_true")]
    pub editorconfig: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            language_store: true,
            editorconfig: true,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Logging(String),
    Language(String, String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
            ValidationError::Language(language, msg) => {
                write!(f, "Language '{}': {}", language, msg)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl FileSettingsConfig {
    /// Validate the application settings
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = self
            .logging
            .validate()
            .err()
            .map(ValidationError::Logging)
            .into_iter()
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl LoadedConfig {
    /// Validate application settings and every language entry
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = self.config.validate().err().unwrap_or_default();
        errors.extend(validate_languages(&self.languages));

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn validate_languages(store: &LanguageSettingsStore) -> Vec<ValidationError> {
    store
        .problems()
        .into_iter()
        .map(|(language, msg)| ValidationError::Language(language, msg))
        .collect()
}
