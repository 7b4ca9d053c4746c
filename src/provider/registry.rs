//! Provider registry: the ordered set of factories used to build settings trees.

use crate::config::ProvidersConfig;
use crate::error::ProviderError;
use crate::file::SourceFile;
use crate::provider::{
    EditorConfigProvider, FnProvider, LanguageSettingsProvider, LanguageSettingsStore,
    SettingsProvider,
};
use crate::settings::SettingsNode;
use std::rc::Rc;
use tracing::{debug, warn};

/// Name of the extension point providers are registered under
pub const FILE_SETTINGS_EXTENSION_POINT: &str = "file-settings";

/// Provider registry for building per-file settings trees
///
/// Registration is append-only. A provider registered later overrides the
/// ones registered before it, because its node is attached in front of theirs.
pub struct ProviderRegistry {
    providers: Vec<Box<dyn SettingsProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Registry with the built-in providers enabled by `config`.
    ///
    /// The language store is registered first and editorconfig second, so
    /// project `.editorconfig` files override per-language preferences.
    pub fn with_defaults(config: &ProvidersConfig, store: LanguageSettingsStore) -> Self {
        let mut registry = Self::new();
        if config.language_store {
            registry.register(LanguageSettingsProvider::new(store));
        }
        if config.editorconfig {
            registry.register(EditorConfigProvider::new());
        }
        registry
    }

    /// Extension point this registry stands for
    pub fn extension_point(&self) -> &'static str {
        FILE_SETTINGS_EXTENSION_POINT
    }

    /// Register a provider
    pub fn register(&mut self, provider: impl SettingsProvider + 'static) {
        debug!(provider = provider.name(), "Registered settings provider");
        self.providers.push(Box::new(provider));
    }

    /// Register a closure as a provider
    pub fn register_fn<F>(&mut self, name: impl Into<String>, produce: F)
    where
        F: Fn(&Rc<SourceFile>) -> Result<SettingsNode, ProviderError> + 'static,
    {
        self.register(FnProvider::new(name, produce));
    }

    /// Provider names in registration order
    pub fn providers(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Build the settings tree for `file`.
    ///
    /// Every provider gets a chance to contribute a child; failing providers are
    /// logged and skipped. Files without a language id, or already closed, get
    /// a root holding only defaults.
    pub fn build(&self, file: &Rc<SourceFile>) -> SettingsNode {
        let mut root = SettingsNode::new(file);

        if !file.is_valid() || file.language().is_none() {
            debug!(
                path = %file.path().display(),
                "No language or context for file, using defaults only"
            );
            return root;
        }

        for provider in &self.providers {
            let name = provider.name();
            match provider.produce(file) {
                Ok(node) if node.is_bound_to(file) => {
                    debug!(provider = name, path = %file.path().display(), "Attached settings node");
                    root.add_child(node);
                }
                Ok(node) => {
                    let err = ProviderError::MalformedProvider {
                        provider: name.to_string(),
                        reason: format!(
                            "produced node '{}' bound to a different file",
                            node.origin()
                        ),
                    };
                    warn!(error = %err, "Skipping settings provider");
                }
                Err(ProviderError::MissingContext(reason)) => {
                    debug!(provider = name, reason = %reason, "Provider does not apply");
                }
                Err(err) => {
                    warn!(provider = name, error = %err, "Skipping settings provider");
                }
            }
        }

        root
    }

    /// Re-read every provider's source into a tree built earlier by `build`.
    ///
    /// Each provider updates the child carrying its name in place, so changes
    /// reach the root's listeners as ordinary property events. Returns the
    /// number of children refreshed.
    pub fn refresh(&self, root: &mut SettingsNode) -> usize {
        let Ok(file) = root.file() else {
            debug!(origin = root.origin(), "Settings tree is unbound, nothing to refresh");
            return 0;
        };

        let mut refreshed = 0;
        for provider in &self.providers {
            let name = provider.name();
            let Some(mut child) = root.child_by_origin_mut(name) else {
                debug!(provider = name, "No attached node to refresh");
                continue;
            };
            match provider.refresh(&file, &mut child) {
                Ok(()) => refreshed += 1,
                Err(ProviderError::MissingContext(reason)) => {
                    debug!(provider = name, reason = %reason, "Provider does not apply");
                }
                Err(err) => {
                    warn!(provider = name, error = %err, "Failed to refresh settings node");
                }
            }
        }

        debug!(path = %file.path().display(), refreshed, "Refreshed settings tree");
        refreshed
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
