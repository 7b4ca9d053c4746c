//! Language settings provider.
//!
//! Reads per-language preferences from the layered configuration store, under
//! `languages.<language-id>`. Store keys are mapped onto properties, some of
//! them through a conversion (the "use spaces" flag becomes an indent style).
//! Keys absent for a language leave the property unset; values that cannot be
//! coerced are logged and treated the same way.

use crate::error::{ProviderError, SettingsError};
use crate::file::SourceFile;
use crate::property::{IndentStyle, Property, PropertyValue};
use crate::provider::{malformed, SettingsProvider};
use crate::settings::SettingsNode;
use config::{Config, ConfigError, File, FileFormat, Map, Value};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, warn};

/// Per-language defaults compiled into the crate; lowest configuration layer
pub const BUNDLED_LANGUAGE_DEFAULTS: &str = include_str!("../../assets/language_defaults.toml");

/// Store table holding the per-language entries
pub const LANGUAGES_KEY: &str = "languages";

type Coerce = fn(&Value) -> Result<PropertyValue, String>;

struct KeyMapping {
    key: &'static str,
    property: Property,
    coerce: Coerce,
}

const LANGUAGE_MAPPINGS: &[KeyMapping] = &[
    KeyMapping {
        key: "indent_width",
        property: Property::IndentWidth,
        coerce: coerce_int,
    },
    KeyMapping {
        key: "insert_spaces_instead_of_tabs",
        property: Property::IndentStyle,
        coerce: coerce_indent_style,
    },
    KeyMapping {
        key: "right_margin_position",
        property: Property::RightMarginPosition,
        coerce: coerce_uint,
    },
    KeyMapping {
        key: "show_right_margin",
        property: Property::ShowRightMargin,
        coerce: coerce_bool,
    },
    KeyMapping {
        key: "tab_width",
        property: Property::TabWidth,
        coerce: coerce_uint,
    },
    KeyMapping {
        key: "trim_trailing_whitespace",
        property: Property::TrimTrailingWhitespace,
        coerce: coerce_bool,
    },
];

fn coerce_int(value: &Value) -> Result<PropertyValue, String> {
    let raw = value.clone().into_int().map_err(|e| e.to_string())?;
    i32::try_from(raw)
        .map(PropertyValue::Int)
        .map_err(|_| format!("{} is out of range", raw))
}

fn coerce_uint(value: &Value) -> Result<PropertyValue, String> {
    let raw = value.clone().into_int().map_err(|e| e.to_string())?;
    u32::try_from(raw)
        .map(PropertyValue::UInt)
        .map_err(|_| format!("{} is out of range", raw))
}

fn coerce_bool(value: &Value) -> Result<PropertyValue, String> {
    value
        .clone()
        .into_bool()
        .map(PropertyValue::Bool)
        .map_err(|e| e.to_string())
}

fn coerce_indent_style(value: &Value) -> Result<PropertyValue, String> {
    value
        .clone()
        .into_bool()
        .map(|use_spaces| PropertyValue::IndentStyle(IndentStyle::from_use_spaces(use_spaces)))
        .map_err(|e| e.to_string())
}

/// Snapshot of the `languages` table of a configuration store
#[derive(Debug, Clone, Default)]
pub struct LanguageSettingsStore {
    languages: HashMap<String, Map<String, Value>>,
}

impl LanguageSettingsStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Extract the language table from a built store
    pub fn from_store(store: &Config) -> Result<Self, SettingsError> {
        let table = match store.get_table(LANGUAGES_KEY) {
            Ok(table) => table,
            Err(ConfigError::NotFound(_)) => return Ok(Self::empty()),
            Err(e) => return Err(e.into()),
        };

        let mut languages = HashMap::new();
        for (id, entry) in table {
            match entry.into_table() {
                Ok(keys) => {
                    languages.insert(id.to_ascii_lowercase(), keys);
                }
                Err(e) => {
                    warn!(language = %id, error = %e, "Ignoring language entry that is not a table");
                }
            }
        }
        Ok(Self { languages })
    }

    /// Store holding only the bundled defaults
    pub fn bundled() -> Result<Self, SettingsError> {
        Self::from_toml(BUNDLED_LANGUAGE_DEFAULTS)
    }

    /// Store parsed from a TOML document with `[languages.<id>]` tables
    pub fn from_toml(source: &str) -> Result<Self, SettingsError> {
        let store = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?;
        Self::from_store(&store)
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.languages.contains_key(language)
    }

    /// Known language ids, sorted
    pub fn languages(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.languages.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Unknown keys and values that cannot be coerced, as `(language, message)` pairs
    pub fn problems(&self) -> Vec<(String, String)> {
        let mut problems = Vec::new();
        for language in self.languages() {
            let Some(keys) = self.languages.get(language) else {
                continue;
            };
            let mut names: Vec<&String> = keys.keys().collect();
            names.sort_unstable();
            for key in names {
                let message = match LANGUAGE_MAPPINGS.iter().find(|m| m.key == key.as_str()) {
                    None => Some(format!("unknown key '{}'", key)),
                    Some(mapping) => (mapping.coerce)(&keys[key.as_str()])
                        .err()
                        .map(|reason| format!("invalid value for '{}': {}", key, reason)),
                };
                if let Some(message) = message {
                    problems.push((language.to_string(), message));
                }
            }
        }
        problems
    }
}

/// Provider name and origin label of language store nodes
pub const LANGUAGE_PROVIDER_NAME: &str = "language-settings";

/// Provider populating nodes from a [`LanguageSettingsStore`]
pub struct LanguageSettingsProvider {
    store: LanguageSettingsStore,
}

impl LanguageSettingsProvider {
    pub fn new(store: LanguageSettingsStore) -> Self {
        Self { store }
    }
}

impl SettingsProvider for LanguageSettingsProvider {
    fn name(&self) -> &str {
        LANGUAGE_PROVIDER_NAME
    }

    fn produce(&self, file: &Rc<SourceFile>) -> Result<SettingsNode, ProviderError> {
        let language = file.language().ok_or_else(|| {
            ProviderError::MissingContext(format!(
                "{} has no language id",
                file.path().display()
            ))
        })?;

        let mut node = SettingsNode::with_origin(file, self.name());
        let Some(keys) = self.store.languages.get(language) else {
            debug!(language, "No stored settings for language");
            return Ok(node);
        };

        for mapping in LANGUAGE_MAPPINGS {
            let Some(raw) = keys.get(mapping.key) else {
                continue;
            };
            match (mapping.coerce)(raw) {
                Ok(value) => node
                    .set(mapping.property, value)
                    .map_err(|e| malformed(self.name(), e))?,
                Err(reason) => {
                    warn!(
                        language,
                        key = mapping.key,
                        reason = %reason,
                        "Ignoring malformed language setting"
                    );
                }
            }
        }

        Ok(node)
    }
}
