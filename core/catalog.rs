use crate::error::{AppError, Result};
use crate::extensions::{ExtensionSet, extension_of};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectType {
    pub extensions: Vec<String>,
    pub syntax: String,
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SyntaxTable {
    #[serde(default)]
    pub extensions: IndexMap<String, String>,
    #[serde(default)]
    pub filenames: IndexMap<String, String>,
    #[serde(default)]
    pub prefixes: IndexMap<String, String>,
}

static PROJECT_TYPES: Lazy<IndexMap<String, ProjectType>> = Lazy::new(|| {
    let yaml_content = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../data/presets.yaml"));
    serde_yml::from_str(yaml_content).expect("Failed to parse embedded data/presets.yaml")
});
static DEFAULT_EXCLUDES: Lazy<Vec<String>> = Lazy::new(|| {
    let yaml_content = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../data/default_excludes.yaml"
    ));
    serde_yml::from_str(yaml_content).expect("Failed to parse embedded data/default_excludes.yaml")
});
static SYNTAX_TABLE: Lazy<SyntaxTable> = Lazy::new(|| {
    let yaml_content = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../data/syntax.yaml"));
    serde_yml::from_str(yaml_content).expect("Failed to parse embedded data/syntax.yaml")
});

pub fn get_project_types() -> &'static IndexMap<String, ProjectType> {
    &PROJECT_TYPES
}
pub fn get_default_excludes() -> &'static [String] {
    &DEFAULT_EXCLUDES
}
pub fn get_syntax_table() -> &'static SyntaxTable {
    &SYNTAX_TABLE
}

pub fn get_project_type(name: &str) -> Result<&'static ProjectType> {
    let key = name.trim().to_lowercase();
    get_project_types()
        .get(&key)
        .ok_or_else(|| AppError::UnknownProjectType(name.trim().to_string()))
}

/// Builds the extension set from preset names (each entry may itself be a
/// comma- or space-separated list) plus extra extensions.
pub fn resolve_extensions<S: AsRef<str>, E: AsRef<str>>(
    types: &[S],
    extra: &[E],
) -> Result<ExtensionSet> {
    let mut set = ExtensionSet::new();

    for type_name in types
        .iter()
        .flat_map(|t| t.as_ref().split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|t| !t.is_empty())
    {
        let project_type = get_project_type(type_name)?;
        log::debug!(
            "Project type '{}' adds: {}",
            type_name,
            project_type.extensions.join(", ")
        );
        for ext in &project_type.extensions {
            set.insert(ext);
        }
    }

    for ext in extra {
        if set.insert(ext.as_ref()) {
            log::trace!("Added extra extension: {}", ext.as_ref());
        }
    }

    if set.is_empty() {
        return Err(AppError::NoExtensions);
    }
    log::debug!("Resolved extensions: {}", set);
    Ok(set)
}

/// Built-in excludes (unless disabled) followed by user patterns.
pub fn resolve_excludes<S: AsRef<str>>(use_defaults: bool, extra: &[S]) -> Vec<String> {
    let mut excludes: Vec<String> = if use_defaults {
        get_default_excludes().to_vec()
    } else {
        log::debug!("Built-in excludes disabled.");
        Vec::new()
    };
    excludes.extend(extra.iter().map(|e| e.as_ref().to_string()));
    excludes
}

/// Fenced-code tag for a file. Well-known names win over the extension table;
/// unknown files get an empty tag.
pub fn syntax_for_path(path: &Path) -> &'static str {
    let table = get_syntax_table();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if let Some(tag) = table.filenames.get(&name) {
        return tag;
    }
    if let Some((_, tag)) = table
        .prefixes
        .iter()
        .find(|(prefix, _)| name.starts_with(prefix.as_str()))
    {
        return tag;
    }
    extension_of(path)
        .and_then(|ext| table.extensions.get(&ext))
        .map(String::as_str)
        .unwrap_or("")
}
