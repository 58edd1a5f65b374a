use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Invalid Base Path: '{path}' {reason}")]
    InvalidBasePath { path: PathBuf, reason: String },

    #[error("No file extensions selected. Use --type or --ext (see --list-types).")]
    NoExtensions,

    #[error("Unknown project type '{0}'. Use --list-types to see available types.")]
    UnknownProjectType(String),

    #[error("No matching files found under '{}'", .0.display())]
    NoFilesFound(PathBuf),

    #[error("TOML Parsing Error: {0}")]
    TomlParse(String),

    #[error("YAML Parsing Error: {0}")]
    YamlError(#[from] serde_yml::Error),

    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File Read Error: Path '{path}', Error: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Write Error: Path '{path}', Error: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Traversal Error: {0}")]
    Traversal(String),

    #[error("Data Loading Error: {0}")]
    DataLoading(String),
}

impl From<walkdir::Error> for AppError {
    fn from(err: walkdir::Error) -> Self {
        AppError::Traversal(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::TomlParse(err.to_string())
    }
}
