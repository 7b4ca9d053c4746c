//! Merge rules: defaults, override order, conflict handling.
//!
//! Bundled language defaults form the bottom layer, so every later source
//! (global file, workspace files, environment) overrides them key by key.

use crate::provider::language::BUNDLED_LANGUAGE_DEFAULTS;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};

/// Prefix of environment variables overriding configuration keys
pub const ENV_PREFIX: &str = "FILESETTINGS";

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .add_source(File::from_str(BUNDLED_LANGUAGE_DEFAULTS, FileFormat::Toml))
        .set_default("providers.language_store", true)?
        .set_default("providers.editorconfig", true)
}

/// Environment overrides, e.g. `FILESETTINGS_LOGGING__LEVEL=debug` or
/// `FILESETTINGS_LANGUAGES__RUST__TAB_WIDTH=4`.
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
