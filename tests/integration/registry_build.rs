//! Building settings trees through the provider registry

use filesettings::config::ProvidersConfig;
use filesettings::provider::{
    EditorConfigProvider, LanguageSettingsProvider, LanguageSettingsStore, ProviderRegistry,
    SettingsProvider,
};
use filesettings::{
    IndentStyle, NewlineType, Property, PropertyValue, ProviderError, SettingsNode, SourceFile,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tempfile::TempDir;

/// Fixed values standing in for a per-language preference store
struct LanguageDefaults;

impl SettingsProvider for LanguageDefaults {
    fn name(&self) -> &str {
        "language-defaults"
    }

    fn produce(&self, file: &Rc<SourceFile>) -> Result<SettingsNode, ProviderError> {
        let mut node = SettingsNode::with_origin(file, self.name());
        if file.language() == Some("python3") {
            node.set(Property::IndentWidth, 8i32).unwrap();
            node.set(Property::TabWidth, 8u32).unwrap();
        }
        Ok(node)
    }
}

/// A project `.editorconfig` that only sets the indent width
struct ProjectIndent;

impl SettingsProvider for ProjectIndent {
    fn name(&self) -> &str {
        "editorconfig"
    }

    fn produce(&self, file: &Rc<SourceFile>) -> Result<SettingsNode, ProviderError> {
        let mut node = SettingsNode::with_origin(file, self.name());
        node.set(Property::IndentWidth, 4i32).unwrap();
        Ok(node)
    }
}

fn write_editorconfig(dir: &TempDir, contents: &str) {
    std::fs::write(dir.path().join(".editorconfig"), contents).unwrap();
}

#[test]
fn test_python_scenario_editorconfig_overrides_language_defaults() {
    let mut registry = ProviderRegistry::new();
    registry.register(LanguageDefaults);
    registry.register(ProjectIndent);

    let file = SourceFile::with_language("/tmp/filesettings-scenario/main.py", Some("python3"));
    let root = registry.build(&file);

    assert_eq!(root.get(Property::IndentWidth), PropertyValue::Int(4));
    assert_eq!(root.get(Property::TabWidth), PropertyValue::UInt(8));
    assert_eq!(root.explain(Property::IndentWidth), Some("editorconfig"));
    assert_eq!(root.explain(Property::TabWidth), Some("language-defaults"));
}

#[test]
fn test_editorconfig_indent_size_also_sets_tab_width() {
    let project = TempDir::new().unwrap();
    write_editorconfig(&project, "root = true\n\n[*.py]\nindent_size = 4\n");

    let mut registry = ProviderRegistry::new();
    registry.register(LanguageDefaults);
    registry.register(EditorConfigProvider::with_ceiling(project.path()));

    let file = SourceFile::new(project.path().join("main.py"));
    let root = registry.build(&file);

    assert_eq!(root.get(Property::IndentWidth), PropertyValue::Int(4));
    assert_eq!(root.get(Property::TabWidth), PropertyValue::UInt(4));
    assert_eq!(root.explain(Property::TabWidth), Some("editorconfig"));
}

#[test]
fn test_priority_follows_registration_order() {
    let build = |order: [&'static str; 2]| {
        let mut registry = ProviderRegistry::new();
        for name in order {
            let width = if name == "a" { 2u32 } else { 6u32 };
            registry.register_fn(name, move |file| {
                let mut node = SettingsNode::with_origin(file, name);
                node.set(Property::TabWidth, width).unwrap();
                Ok(node)
            });
        }
        let file = SourceFile::with_language("/tmp/filesettings-order/lib.rs", Some("rust"));
        registry.build(&file).get(Property::TabWidth)
    };

    assert_eq!(build(["a", "b"]), PropertyValue::UInt(6));
    assert_eq!(build(["b", "a"]), PropertyValue::UInt(2));
}

#[test]
fn test_nobody_sets_show_right_margin() {
    let mut registry = ProviderRegistry::new();
    registry.register(LanguageDefaults);

    let file = SourceFile::with_language("/tmp/filesettings-margin/app.py", Some("python3"));
    let root = registry.build(&file);

    assert_eq!(root.get(Property::ShowRightMargin), PropertyValue::Bool(false));
    assert!(!root.is_set(Property::ShowRightMargin));
}

#[test]
fn test_use_spaces_flag_translation() {
    let store = LanguageSettingsStore::from_toml(
        r#"
[languages.python3]
insert_spaces_instead_of_tabs = true

[languages.go]
insert_spaces_instead_of_tabs = false
"#,
    )
    .unwrap();
    let mut registry = ProviderRegistry::new();
    registry.register(LanguageSettingsProvider::new(store));

    let python = SourceFile::with_language("/tmp/filesettings-spaces/app.py", Some("python3"));
    let go = SourceFile::with_language("/tmp/filesettings-spaces/main.go", Some("go"));

    assert_eq!(
        registry.build(&python).get(Property::IndentStyle),
        PropertyValue::IndentStyle(IndentStyle::Spaces)
    );
    assert_eq!(
        registry.build(&go).get(Property::IndentStyle),
        PropertyValue::IndentStyle(IndentStyle::Tabs)
    );
}

#[test]
fn test_reloaded_language_store_reaches_root() {
    let before = LanguageSettingsStore::from_toml(
        "[languages.python3]\ntab_width = 4\nindent_width = 2\nshow_right_margin = true\n",
    )
    .unwrap();
    let after = LanguageSettingsStore::from_toml(
        "[languages.python3]\ntab_width = 2\nshow_right_margin = true\n",
    )
    .unwrap();

    let mut registry = ProviderRegistry::new();
    registry.register(LanguageSettingsProvider::new(before));
    let file = SourceFile::with_language("/tmp/filesettings-reload/app.py", Some("python3"));
    let mut root = registry.build(&file);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    root.subscribe(move |event| {
        if let Some(change) = event.property_change() {
            sink.borrow_mut().push(change.notification_name());
        }
    });

    let mut reloaded = ProviderRegistry::new();
    reloaded.register(LanguageSettingsProvider::new(after));
    assert_eq!(reloaded.refresh(&mut root), 1);

    assert_eq!(*seen.borrow(), vec!["indent-width-set", "tab-width"]);
    assert_eq!(root.get(Property::TabWidth), PropertyValue::UInt(2));
    assert!(!root.is_set(Property::IndentWidth));
    assert_eq!(root.get(Property::ShowRightMargin), PropertyValue::Bool(true));
}

#[test]
fn test_closed_file_is_not_offered_to_providers() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let mut registry = ProviderRegistry::new();
    registry.register_fn("counting", move |file| {
        counter.set(counter.get() + 1);
        Ok(SettingsNode::with_origin(file, "counting"))
    });

    let file = SourceFile::with_language("/tmp/filesettings-closed/app.py", Some("python3"));
    file.invalidate();
    let root = registry.build(&file);

    assert_eq!(calls.get(), 0);
    assert!(root.children().is_empty());
    assert_eq!(root.get(Property::TabWidth), PropertyValue::UInt(8));
}

#[test]
fn test_default_registry_combines_bundled_store_and_editorconfig() {
    let project = TempDir::new().unwrap();
    write_editorconfig(
        &project,
        "root = true\n\n[*]\nend_of_line = crlf\n\n[*.rs]\nmax_line_length = 120\n",
    );

    let mut registry = ProviderRegistry::new();
    registry.register(LanguageSettingsProvider::new(
        LanguageSettingsStore::bundled().unwrap(),
    ));
    registry.register(EditorConfigProvider::with_ceiling(project.path()));
    assert_eq!(registry.providers(), vec!["language-settings", "editorconfig"]);

    let file = SourceFile::new(project.path().join("src").join("lib.rs"));
    let resolved = registry.build(&file).resolve();

    assert_eq!(resolved.indent_width, 4);
    assert_eq!(resolved.right_margin_position, 120);
    assert!(resolved.show_right_margin);
    assert_eq!(resolved.newline_type, NewlineType::CrLf);
}

#[test]
fn test_with_defaults_toggles() {
    let none = ProvidersConfig {
        language_store: false,
        editorconfig: false,
    };
    assert!(ProviderRegistry::with_defaults(&none, LanguageSettingsStore::empty()).is_empty());
}
