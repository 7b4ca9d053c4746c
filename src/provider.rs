//! Settings Providers
//!
//! A provider is a factory that, given a file, produces a populated
//! [`SettingsNode`]. The registry attaches one node per provider to the root of
//! each file's tree. Providers read whatever external source they wrap while
//! producing the node and translate foreign encodings into typed property
//! values; a source that cannot be read simply leaves properties unset. When a
//! source changes, `refresh` updates the attached node in place.

pub mod editorconfig;
pub mod language;
pub mod registry;

pub use editorconfig::EditorConfigProvider;
pub use language::{LanguageSettingsProvider, LanguageSettingsStore};
pub use registry::{ProviderRegistry, FILE_SETTINGS_EXTENSION_POINT};

use crate::error::ProviderError;
use crate::file::SourceFile;
use crate::settings::{ChildHandle, SettingsNode};
use std::rc::Rc;

/// Factory for one kind of settings node
pub trait SettingsProvider {
    /// Name used as the origin label of produced nodes and in logs
    fn name(&self) -> &str;

    /// Produce a fully populated node bound to `file`
    fn produce(&self, file: &Rc<SourceFile>) -> Result<SettingsNode, ProviderError>;

    /// Bring a node this provider attached earlier up to date with its source.
    ///
    /// Produces a fresh node and copies its local values onto `node`, so only
    /// properties that actually changed are announced.
    fn refresh(
        &self,
        file: &Rc<SourceFile>,
        node: &mut ChildHandle<'_>,
    ) -> Result<(), ProviderError> {
        let fresh = self.produce(file)?;
        node.update_from(&fresh)
            .map_err(|e| malformed(self.name(), e))
    }
}

/// Provider backed by a closure
pub struct FnProvider<F> {
    name: String,
    produce: F,
}

impl<F> FnProvider<F>
where
    F: Fn(&Rc<SourceFile>) -> Result<SettingsNode, ProviderError>,
{
    pub fn new(name: impl Into<String>, produce: F) -> Self {
        Self {
            name: name.into(),
            produce,
        }
    }
}

impl<F> SettingsProvider for FnProvider<F>
where
    F: Fn(&Rc<SourceFile>) -> Result<SettingsNode, ProviderError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn produce(&self, file: &Rc<SourceFile>) -> Result<SettingsNode, ProviderError> {
        (self.produce)(file)
    }
}

/// Wrap a failed write while populating a node
pub(crate) fn malformed(provider: &str, err: impl std::fmt::Display) -> ProviderError {
    ProviderError::MalformedProvider {
        provider: provider.to_string(),
        reason: err.to_string(),
    }
}
