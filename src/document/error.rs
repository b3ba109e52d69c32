use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DocumentError {
    #[error("document file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read document '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse document '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: Box<DocumentError>,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("expected a mapping, found {0}")]
    NotAMapping(&'static str),
}
