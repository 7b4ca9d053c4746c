//! Config loader facade: builds the layered store and deserializes it.

use crate::config::merge::merge_policy;
use crate::config::sources::{global_file, workspace_file};
use crate::config::FileSettingsConfig;
use crate::error::SettingsError;
use crate::provider::LanguageSettingsStore;
use config::{Config, ConfigError, File};
use std::path::{Path, PathBuf};

/// Application configuration together with the per-language store it came with
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: FileSettingsConfig,
    pub languages: LanguageSettingsStore,
}

impl LoadedConfig {
    fn from_store(store: &Config) -> Result<Self, SettingsError> {
        let config: FileSettingsConfig = store.clone().try_deserialize()?;
        let languages = LanguageSettingsStore::from_store(store)?;
        Ok(Self { config, languages })
    }
}

/// Loads configuration from every layer
pub struct ConfigLoader;

impl ConfigLoader {
    /// Build the layered store for a workspace.
    ///
    /// Precedence (lowest to highest): bundled defaults, global file,
    /// workspace files, environment.
    pub fn build_store(workspace_root: &Path) -> Result<Config, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        builder.add_source(merge_policy::environment()).build()
    }

    /// Build the store from an explicit file instead of global/workspace discovery
    pub fn build_store_from_file(path: &Path) -> Result<Config, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(merge_policy::environment())
            .build()
    }

    /// Load configuration for a workspace
    pub fn load(workspace_root: &Path) -> Result<LoadedConfig, SettingsError> {
        let store = Self::build_store(workspace_root)?;
        LoadedConfig::from_store(&store)
    }

    /// Load configuration from an explicit file
    pub fn load_from_file(path: &Path) -> Result<LoadedConfig, SettingsError> {
        let store = Self::build_store_from_file(path)?;
        LoadedConfig::from_store(&store)
    }

    /// Global config file location, if a home directory is known
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    /// Workspace config file location
    pub fn workspace_config_path(workspace_root: &Path) -> PathBuf {
        workspace_file::workspace_config_path(workspace_root)
    }
}

impl Default for LoadedConfig {
    fn default() -> Self {
        Self {
            config: FileSettingsConfig::default(),
            languages: LanguageSettingsStore::bundled().unwrap_or_default(),
        }
    }
}
