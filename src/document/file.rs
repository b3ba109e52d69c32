//! File-based document loading.

use std::path::Path;

use super::{DocumentError, Value};

/// Input format of a document, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
    Toml,
}

impl Format {
    /// Picks the format for `path`. Unknown extensions are read as YAML,
    /// which also accepts JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
            _ => Format::Yaml,
        }
    }

    pub fn parse(self, contents: &str) -> Result<Value, DocumentError> {
        match self {
            Format::Yaml => Value::from_yaml_str(contents),
            Format::Json => Value::from_json_str(contents),
            Format::Toml => Value::from_toml_str(contents),
        }
    }
}

/// Reads a file into a string, mapping a missing file to
/// [`DocumentError::FileNotFound`].
pub fn read_file(path: impl AsRef<Path>) -> Result<String, DocumentError> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(DocumentError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => Err(DocumentError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Loads and parses a document file.
pub fn load_file(path: impl AsRef<Path>) -> Result<Value, DocumentError> {
    let path = path.as_ref();
    let contents = read_file(path)?;
    Format::from_path(path)
        .parse(&contents)
        .map_err(|e| DocumentError::ParseError {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
}
