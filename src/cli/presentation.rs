//! CLI presentation: text and json formatters per command.

use crate::config::ValidationError;
use crate::file::SourceFile;
use crate::property::{all_properties, Property, PropertyValue};
use crate::settings::ResolvedSettings;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde_json::json;

/// One row of `explain` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyExplanation {
    pub property: Property,
    pub value: PropertyValue,
    pub is_set: bool,
    /// Origin of the supplying node, `None` when the schema default applies
    pub source: Option<String>,
}

fn language_label(file: &SourceFile) -> &str {
    file.language().unwrap_or("(none)")
}

pub fn format_resolve_text(file: &SourceFile, settings: &ResolvedSettings) -> String {
    let mut output = format!("File: {}\n", file.path().display());
    output.push_str(&format!("Language: {}\n\n", language_label(file)));
    output.push_str(&format!("  {:<26} {}\n", "indent-width", settings.indent_width));
    output.push_str(&format!("  {:<26} {}\n", "indent-style", settings.indent_style));
    output.push_str(&format!(
        "  {:<26} {}\n",
        "right-margin-position", settings.right_margin_position
    ));
    output.push_str(&format!(
        "  {:<26} {}\n",
        "show-right-margin", settings.show_right_margin
    ));
    output.push_str(&format!("  {:<26} {}\n", "tab-width", settings.tab_width));
    output.push_str(&format!(
        "  {:<26} {}\n",
        "trim-trailing-whitespace", settings.trim_trailing_whitespace
    ));
    output.push_str(&format!(
        "  {:<26} {}\n",
        "insert-trailing-newline", settings.insert_trailing_newline
    ));
    output.push_str(&format!("  {:<26} {}\n", "newline-type", settings.newline_type));
    output.push_str(&format!(
        "  {:<26} {}\n",
        "encoding",
        settings.encoding.as_deref().unwrap_or("(unset)")
    ));
    output.push_str(&format!(
        "\nEffective indent: {} column(s)\n",
        settings.effective_indent_width()
    ));
    output
}

pub fn format_resolve_json(file: &SourceFile, settings: &ResolvedSettings) -> String {
    let out = json!({
        "path": file.path().display().to_string(),
        "language": file.language(),
        "settings": settings,
        "effective_indent_width": settings.effective_indent_width(),
    });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_explain_text(file: &SourceFile, rows: &[PropertyExplanation]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_BORDERS_ONLY)
        .set_header(vec!["Property", "Value", "Set", "Source"]);
    for row in rows {
        table.add_row(vec![
            row.property.name().to_string(),
            row.value.to_string(),
            if row.is_set { "yes" } else { "no" }.to_string(),
            row.source.as_deref().unwrap_or("default").to_string(),
        ]);
    }
    format!(
        "File: {}\nLanguage: {}\n\n{}",
        file.path().display(),
        language_label(file),
        table
    )
}

pub fn format_properties_text() -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_BORDERS_ONLY)
        .set_header(vec!["Property", "Type", "Default"]);
    for descriptor in all_properties() {
        table.add_row(vec![
            descriptor.name.to_string(),
            descriptor.value_type.to_string(),
            descriptor.default.to_string(),
        ]);
    }
    table.to_string()
}

pub fn format_properties_json() -> String {
    let properties: Vec<_> = all_properties()
        .iter()
        .map(|descriptor| {
            json!({
                "name": descriptor.name,
                "type": descriptor.value_type,
                "default": descriptor.default,
            })
        })
        .collect();
    let total = properties.len();
    let out = json!({ "properties": properties, "total": total });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_validation_result(errors: &[ValidationError]) -> String {
    if errors.is_empty() {
        return "Configuration is valid.".to_string();
    }
    let mut output = format!("{} problem(s) found:\n", errors.len());
    for error in errors {
        output.push_str(&format!("  - {}\n", error));
    }
    output
}
