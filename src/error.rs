//! Error types for the file settings resolution engine.

use crate::property::{Property, ValueType};
use thiserror::Error;

/// Errors surfaced by property tables and settings nodes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("Invalid property: {0}")]
    InvalidProperty(String),

    #[error("Type mismatch for {property}: expected {expected}, got {actual}")]
    TypeMismatch {
        property: Property,
        expected: ValueType,
        actual: ValueType,
    },

    #[error("Settings node is no longer bound to a file")]
    UnboundFile,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors a provider may report while producing a node.
///
/// None of these abort tree construction; the registry logs them and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Provider does not apply: {0}")]
    MissingContext(String),

    #[error("Malformed provider {provider}: {reason}")]
    MalformedProvider { provider: String, reason: String },

    #[error("Provider {provider} source unavailable: {reason}")]
    Source { provider: String, reason: String },
}

impl From<config::ConfigError> for SettingsError {
    fn from(err: config::ConfigError) -> Self {
        SettingsError::Config(err.to_string())
    }
}
