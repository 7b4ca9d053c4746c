//! EditorConfig provider.
//!
//! Collects `.editorconfig` files from the file's directory upward, stopping
//! after one that declares `root = true`. Sections are matched against the
//! path of the file relative to the `.editorconfig` that contains them; nearer
//! files override farther ones and later sections override earlier ones.

use crate::error::ProviderError;
use crate::file::SourceFile;
use crate::property::{IndentStyle, NewlineType, Property, PropertyValue};
use crate::provider::{malformed, SettingsProvider};
use crate::settings::SettingsNode;
use glob::{MatchOptions, Pattern};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, warn};

/// Name of the files this provider reads
pub const EDITORCONFIG_FILE_NAME: &str = ".editorconfig";

/// Provider name and origin label of editorconfig nodes
pub const EDITORCONFIG_PROVIDER_NAME: &str = "editorconfig";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// One `[glob]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub glob: String,
    pub pairs: Vec<(String, String)>,
}

/// A parsed `.editorconfig` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfigFile {
    /// Directory the file lives in; section globs are relative to it
    pub dir: PathBuf,
    pub root: bool,
    pub sections: Vec<Section>,
}

impl EditorConfigFile {
    /// Parse editorconfig text. Unparseable lines are skipped.
    pub fn parse(dir: impl Into<PathBuf>, source: &str) -> Self {
        let mut root = false;
        let mut sections: Vec<Section> = Vec::new();

        for line in source.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                sections.push(Section {
                    glob: header.trim().to_string(),
                    pairs: Vec::new(),
                });
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                debug!(line, "Skipping unparseable editorconfig line");
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim().to_string();

            match sections.last_mut() {
                Some(section) => section.pairs.push((key, value)),
                None if key == "root" => root = value.eq_ignore_ascii_case("true"),
                None => {}
            }
        }

        Self {
            dir: dir.into(),
            root,
            sections,
        }
    }

    /// Key/value pairs of every section matching `path`, in file order
    fn matching_pairs<'a>(&'a self, path: &Path) -> Vec<&'a (String, String)> {
        let Some(relative) = relative_glob_path(&self.dir, path) else {
            return Vec::new();
        };
        self.sections
            .iter()
            .filter(|section| section_matches(&section.glob, &relative))
            .flat_map(|section| section.pairs.iter())
            .collect()
    }
}

/// Path of `path` relative to `dir`, with `/` separators
fn relative_glob_path(dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(dir).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

fn section_matches(glob: &str, relative: &str) -> bool {
    // Globs without a slash match the file name in any directory.
    let anchored = if glob.contains('/') {
        glob.trim_start_matches('/').to_string()
    } else {
        format!("**/{}", glob)
    };

    expand_braces(&anchored).iter().any(|candidate| {
        match Pattern::new(candidate) {
            Ok(pattern) => pattern.matches_with(relative, MATCH_OPTIONS),
            Err(e) => {
                debug!(glob = %candidate, error = %e, "Skipping invalid editorconfig glob");
                false
            }
        }
    })
}

/// Expand `{a,b}` alternatives. Braces without a top-level comma stay literal.
fn expand_braces(glob: &str) -> Vec<String> {
    let Some(open) = glob.find('{') else {
        return vec![glob.to_string()];
    };

    let mut depth = 0usize;
    let mut close = None;
    let mut commas = Vec::new();
    for (i, ch) in glob[open..].char_indices() {
        let i = open + i;
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            ',' if depth == 1 => commas.push(i),
            _ => {}
        }
    }

    let Some(close) = close else {
        return vec![glob.to_string()];
    };
    let prefix = &glob[..open];
    let suffix = &glob[close + 1..];

    if commas.is_empty() {
        return expand_braces(suffix)
            .into_iter()
            .map(|rest| format!("{}{}{}", prefix, &glob[open..=close], rest))
            .collect();
    }

    let mut bounds = vec![open];
    bounds.extend(commas);
    bounds.push(close);

    bounds
        .windows(2)
        .flat_map(|w| expand_braces(&format!("{}{}{}", prefix, &glob[w[0] + 1..w[1]], suffix)))
        .collect()
}

/// Translate one editorconfig pair into a property assignment
fn map_pair(key: &str, value: &str) -> Option<(Property, PropertyValue)> {
    let lowered = value.to_ascii_lowercase();
    let mapped: Option<(Property, PropertyValue)> = match key {
        "indent_style" => lowered
            .parse::<IndentStyle>()
            .ok()
            .map(|style| (Property::IndentStyle, style.into())),
        "indent_size" if lowered == "tab" => Some((Property::IndentWidth, PropertyValue::Int(-1))),
        "indent_size" => lowered
            .parse::<i32>()
            .ok()
            .filter(|size| *size > 0)
            .map(|size| (Property::IndentWidth, size.into())),
        "tab_width" => lowered
            .parse::<u32>()
            .ok()
            .filter(|width| *width > 0)
            .map(|width| (Property::TabWidth, width.into())),
        "end_of_line" => lowered
            .parse::<NewlineType>()
            .ok()
            .map(|newline| (Property::NewlineType, newline.into())),
        "charset" => Some((Property::Encoding, PropertyValue::from(lowered.as_str()))),
        "trim_trailing_whitespace" => parse_bool(&lowered)
            .map(|trim| (Property::TrimTrailingWhitespace, trim.into())),
        "insert_final_newline" => parse_bool(&lowered)
            .map(|insert| (Property::InsertTrailingNewline, insert.into())),
        "max_line_length" => lowered
            .parse::<u32>()
            .ok()
            .map(|column| (Property::RightMarginPosition, column.into())),
        _ => return None,
    };

    if mapped.is_none() && lowered != "off" {
        debug!(key, value, "Ignoring malformed editorconfig value");
    }
    mapped
}

fn derive_implied_pairs(pairs: &mut BTreeMap<String, String>) {
    let tab_style = pairs
        .get("indent_style")
        .is_some_and(|style| style.eq_ignore_ascii_case("tab"));
    if tab_style && !pairs.contains_key("indent_size") {
        pairs.insert("indent_size".to_string(), "tab".to_string());
    }

    if !pairs.contains_key("tab_width") {
        let size = pairs
            .get("indent_size")
            .filter(|size| size.parse::<u32>().is_ok())
            .cloned();
        if let Some(size) = size {
            pairs.insert("tab_width".to_string(), size);
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Provider reading `.editorconfig` files
#[derive(Debug, Clone, Default)]
pub struct EditorConfigProvider {
    /// Directory above which no `.editorconfig` is read
    ceiling: Option<PathBuf>,
}

impl EditorConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the upward search at `dir` (inclusive)
    pub fn with_ceiling(dir: impl Into<PathBuf>) -> Self {
        Self {
            ceiling: Some(dir.into()),
        }
    }

    /// Load the `.editorconfig` chain for `path`, farthest first
    pub fn discover(&self, path: &Path) -> Vec<EditorConfigFile> {
        let mut chain = Vec::new();

        for dir in path.ancestors().skip(1) {
            let candidate = dir.join(EDITORCONFIG_FILE_NAME);
            if candidate.is_file() {
                match std::fs::read_to_string(&candidate) {
                    Ok(source) => {
                        let parsed = EditorConfigFile::parse(dir, &source);
                        let root = parsed.root;
                        chain.push(parsed);
                        if root {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(path = %candidate.display(), error = %e, "Failed to read editorconfig");
                    }
                }
            }
            if self.ceiling.as_deref() == Some(dir) {
                break;
            }
        }

        chain.reverse();
        chain
    }

    /// Effective editorconfig pairs for `path`, keys lowercased.
    ///
    /// A value of `unset` removes whatever an earlier section assigned. After
    /// merging, `indent_style = tab` without a size implies `indent_size = tab`,
    /// and a numeric `indent_size` without a `tab_width` implies that width.
    pub fn effective_pairs(&self, path: &Path) -> BTreeMap<String, String> {
        let mut pairs = BTreeMap::new();
        for file in self.discover(path) {
            for (key, value) in file.matching_pairs(path) {
                if value.eq_ignore_ascii_case("unset") {
                    pairs.remove(key);
                } else {
                    pairs.insert(key.clone(), value.clone());
                }
            }
        }
        derive_implied_pairs(&mut pairs);
        pairs
    }
}

impl SettingsProvider for EditorConfigProvider {
    fn name(&self) -> &str {
        EDITORCONFIG_PROVIDER_NAME
    }

    fn produce(&self, file: &Rc<SourceFile>) -> Result<SettingsNode, ProviderError> {
        let mut node = SettingsNode::with_origin(file, self.name());
        let pairs = self.effective_pairs(file.path());

        for (key, value) in &pairs {
            if let Some((property, value)) = map_pair(key, value) {
                node.set(property, value)
                    .map_err(|e| malformed(self.name(), e))?;
            }
        }

        debug!(
            path = %file.path().display(),
            pairs = pairs.len(),
            "Applied editorconfig settings"
        );
        Ok(node)
    }
}
