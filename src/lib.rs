//! filesettings: cascading per-file formatting settings
//!
//! Each open file gets a small tree of [`settings::SettingsNode`]s. The root
//! belongs to the file, and every registered provider (language preferences,
//! `.editorconfig`, or anything the host registers) contributes one child.
//! Reading a property returns the value of the highest-priority node that has
//! it set, falling back to the schema default from [`property`].

pub mod cli;
pub mod config;
pub mod error;
pub mod file;
pub mod logging;
pub mod property;
pub mod provider;
pub mod settings;

pub use error::{ProviderError, SettingsError};
pub use file::SourceFile;
pub use property::{IndentStyle, NewlineType, Property, PropertyValue, ValueType};
pub use provider::{ProviderRegistry, SettingsProvider};
pub use settings::{ChildHandle, ResolvedSettings, SettingsEvent, SettingsNode};
