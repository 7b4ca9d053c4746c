//! CLI route: single route table and run context. Dispatches to the registry and presentation.

use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_explain_text, format_properties_json, format_properties_text, format_resolve_json,
    format_resolve_text, format_validation_result, PropertyExplanation,
};
use crate::config::{ConfigLoader, LoadedConfig};
use crate::error::SettingsError;
use crate::file::SourceFile;
use crate::property::Property;
use crate::provider::ProviderRegistry;
use crate::settings::{SettingsNode, ROOT_ORIGIN};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, info};

/// Runtime context for CLI execution: workspace, loaded config, and the provider registry.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    workspace_root: PathBuf,
    loaded: LoadedConfig,
    registry: ProviderRegistry,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        no_editorconfig: bool,
    ) -> Result<Self, SettingsError> {
        let workspace_root = dunce::canonicalize(&workspace_root).unwrap_or(workspace_root);
        let loaded = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };

        let mut providers = loaded.config.providers.clone();
        if no_editorconfig {
            providers.editorconfig = false;
        }
        let registry = ProviderRegistry::with_defaults(&providers, loaded.languages.clone());
        info!(
            workspace = %workspace_root.display(),
            providers = ?registry.providers(),
            "Run context ready"
        );

        Ok(Self {
            workspace_root,
            loaded,
            registry,
        })
    }

    /// Provider registry used to build settings trees.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, SettingsError> {
        match command {
            Commands::Resolve {
                path,
                language,
                format,
            } => self.handle_resolve(path, language.as_deref(), format),
            Commands::Explain { path, language } => {
                self.handle_explain(path, language.as_deref())
            }
            Commands::Properties { format } => match format.as_str() {
                "json" => Ok(format_properties_json()),
                "text" => Ok(format_properties_text()),
                other => Err(invalid_format(other)),
            },
            Commands::Validate => self.handle_validate(),
        }
    }

    fn source_file(&self, path: &Path, language: Option<&str>) -> Rc<SourceFile> {
        let path = self.workspace_root.join(path);
        match language {
            Some(language) => SourceFile::with_language(path, Some(language)),
            None => SourceFile::new(path),
        }
    }

    fn build_tree(&self, path: &Path, language: Option<&str>) -> (Rc<SourceFile>, SettingsNode) {
        let file = self.source_file(path, language);
        let root = self.registry.build(&file);
        debug!(
            path = %file.path().display(),
            children = root.children().len(),
            "Built settings tree"
        );
        (file, root)
    }

    fn handle_resolve(
        &self,
        path: &Path,
        language: Option<&str>,
        format: &str,
    ) -> Result<String, SettingsError> {
        let (file, root) = self.build_tree(path, language);
        let settings = root.resolve();
        match format {
            "json" => Ok(format_resolve_json(&file, &settings)),
            "text" => Ok(format_resolve_text(&file, &settings)),
            other => Err(invalid_format(other)),
        }
    }

    fn handle_explain(&self, path: &Path, language: Option<&str>) -> Result<String, SettingsError> {
        let (file, root) = self.build_tree(path, language);
        let rows: Vec<PropertyExplanation> = Property::ALL
            .iter()
            .map(|&property| {
                let is_set = root.is_set(property);
                let source = match root.explain(property) {
                    Some(origin) => Some(origin.to_string()),
                    None if is_set => Some(ROOT_ORIGIN.to_string()),
                    None => None,
                };
                PropertyExplanation {
                    property,
                    value: root.get(property),
                    is_set,
                    source,
                }
            })
            .collect();
        Ok(format_explain_text(&file, &rows))
    }

    fn handle_validate(&self) -> Result<String, SettingsError> {
        match self.loaded.validate() {
            Ok(()) => Ok(format_validation_result(&[])),
            Err(errors) => Err(SettingsError::Config(
                format_validation_result(&errors).trim_end().to_string(),
            )),
        }
    }
}

fn invalid_format(format: &str) -> SettingsError {
    SettingsError::Config(format!(
        "Invalid output format: {} (must be 'text' or 'json')",
        format
    ))
}
