use crate::error::{AppError, Result};
use crate::gather::TraversalPolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILENAME: &str = "code2md.toml";
pub const OUTPUT_SUFFIX: &str = "_code.md";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub filters: FiltersConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub traversal: TraversalConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    #[serde(default)]
    pub project_name: Option<String>,
    /// Preset names, e.g. `["python", "config"]`.
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub extensions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FiltersConfig {
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default = "default_true")]
    pub use_default_excludes: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub include_tree: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct TraversalConfig {
    #[serde(default)]
    pub policy: TraversalPolicy,
}

fn default_true() -> bool {
    true
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            use_default_excludes: default_true(),
        }
    }
}
impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: None,
            include_tree: default_true(),
        }
    }
}

impl Config {
    /// Expands `~`, canonicalizes and checks that the result is a directory.
    pub fn determine_base_path(cli_directory: Option<&Path>) -> Result<PathBuf> {
        let path_to_resolve = match cli_directory {
            Some(p) => PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).into_owned()),
            None => env::current_dir().map_err(AppError::Io)?,
        };

        if !path_to_resolve.exists() {
            return Err(AppError::InvalidBasePath {
                path: path_to_resolve,
                reason: "does not exist".to_string(),
            });
        }
        if !path_to_resolve.is_dir() {
            return Err(AppError::InvalidBasePath {
                path: path_to_resolve,
                reason: "is not a directory".to_string(),
            });
        }

        path_to_resolve.canonicalize().map_err(|e| AppError::InvalidBasePath {
            reason: format!("could not be canonicalized: {}", e),
            path: path_to_resolve,
        })
    }

    pub fn resolve_config_path(
        base_path: &Path,
        cli_config_file: Option<&Path>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        match cli_config_file {
            Some(p) => {
                let path = PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).into_owned());
                if !path.is_file() {
                    return Err(AppError::Config(format!(
                        "Specified config file not found at path: {}",
                        path.display()
                    )));
                }
                log::debug!("Using specified config file path: {}", path.display());
                Ok(Some(path))
            }
            None => {
                let default_path = base_path.join(DEFAULT_CONFIG_FILENAME);
                if default_path.is_file() {
                    log::debug!("Using default config file path: {}", default_path.display());
                    Ok(Some(default_path))
                } else {
                    log::debug!(
                        "No config file specified and default not found at: {}",
                        default_path.display()
                    );
                    Ok(None)
                }
            }
        }
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&toml_content).map_err(|e| {
            AppError::TomlParse(format!(
                "Error parsing config file '{}': {}. Check TOML syntax and structure.",
                config_path.display(),
                e
            ))
        })
    }

    pub fn from_toml_str(toml_content: &str) -> Result<Self> {
        Ok(toml::from_str::<Config>(toml_content)?)
    }

    pub fn get_effective_project_name(&self, base_path: &Path) -> String {
        self.general.project_name.clone().unwrap_or_else(|| {
            base_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "project".to_string())
        })
    }

    /// Configured output path, or `<base>/<sanitized name>_code.md`.
    pub fn get_effective_output_path(&self, base_path: &Path, project_name: &str) -> PathBuf {
        match &self.output.path {
            Some(path) => path.clone(),
            None => base_path.join(format!("{}{}", sanitize_file_stem(project_name), OUTPUT_SUFFIX)),
        }
    }
}

/// Replaces every char that is not alphanumeric, `-` or `_` with `_`.
pub fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.filters.use_default_excludes);
        assert!(config.output.include_tree);
        assert_eq!(config.traversal.policy, TraversalPolicy::Skip);
        assert_eq!(Config::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn test_parses_full_config() {
        let config = Config::from_toml_str(
            r#"
            [general]
            project_name = "demo"
            types = ["python", "config"]
            extensions = [".graphql"]

            [filters]
            exclude = ["fixtures"]
            use_default_excludes = false

            [output]
            path = "out.md"
            include_tree = false

            [traversal]
            policy = "fail_fast"
            "#,
        )
        .unwrap();
        assert_eq!(config.general.project_name.as_deref(), Some("demo"));
        assert_eq!(config.general.types, vec!["python", "config"]);
        assert_eq!(config.filters.exclude, vec!["fixtures"]);
        assert!(!config.filters.use_default_excludes);
        assert_eq!(config.output.path, Some(PathBuf::from("out.md")));
        assert!(!config.output.include_tree);
        assert_eq!(config.traversal.policy, TraversalPolicy::FailFast);
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let err = Config::from_toml_str("[general]\ncolour = \"red\"\n").unwrap_err();
        assert!(matches!(err, AppError::TomlParse(_)));
    }

    #[test]
    fn test_sanitize_and_output_path() {
        assert_eq!(sanitize_file_stem("my app (v2).x"), "my_app__v2__x");
        let config = Config::default();
        assert_eq!(
            config.get_effective_output_path(Path::new("/work/my app"), "my app"),
            PathBuf::from("/work/my app/my_app_code.md")
        );
    }

    #[test]
    fn test_determine_base_path_errors() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let missing = Config::determine_base_path(Some(temp_dir.path().join("missing").as_path()));
        assert!(matches!(missing, Err(AppError::InvalidBasePath { .. })));
        let not_dir = Config::determine_base_path(Some(file.as_path()));
        assert!(matches!(not_dir, Err(AppError::InvalidBasePath { .. })));

        let ok = Config::determine_base_path(Some(temp_dir.path())).unwrap();
        assert_eq!(ok, temp_dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_resolve_config_path() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        assert_eq!(Config::resolve_config_path(base, None, false).unwrap(), None);

        fs::write(base.join(DEFAULT_CONFIG_FILENAME), "").unwrap();
        assert_eq!(
            Config::resolve_config_path(base, None, false).unwrap(),
            Some(base.join(DEFAULT_CONFIG_FILENAME))
        );
        assert_eq!(Config::resolve_config_path(base, None, true).unwrap(), None);
        assert!(Config::resolve_config_path(base, Some(base.join("nope.toml").as_path()), false).is_err());
    }
}
