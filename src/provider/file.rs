//! Provider reading values from local files.

use std::path::PathBuf;

use super::{Provider, ProviderError};
use crate::config::Config;
use crate::document::{load_file, read_file, Mapping};

/// Reads whole files as values, or parses them as documents for fragment lookups.
///
/// Relative paths are joined to the `base` query parameter when given.
#[derive(Debug, Clone, Default)]
pub struct FileProvider {
    base: Option<PathBuf>,
}

impl FileProvider {
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.get_string(&["base"]).map(PathBuf::from))
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        match &self.base {
            Some(base) => base.join(path),
            None => PathBuf::from(path),
        }
    }
}

impl Provider for FileProvider {
    fn fetch_value(&self, path: &str) -> Result<String, ProviderError> {
        Ok(read_file(self.resolve_path(path))?)
    }

    fn fetch_structured(&self, path: &str) -> Result<Mapping, ProviderError> {
        Ok(load_file(self.resolve_path(path))?.into_mapping()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentError, Value};

    #[test]
    fn test_reads_relative_to_base() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("token.txt"), "s3cr3t").unwrap();
        std::fs::write(dir.path().join("app.yaml"), "db:\n  user: admin\n").unwrap();

        let provider = FileProvider::new(Some(dir.path().to_path_buf()));
        assert_eq!(provider.fetch_value("token.txt").unwrap(), "s3cr3t");

        let doc = provider.fetch_structured("app.yaml").unwrap();
        assert_eq!(doc["db"].as_mapping().unwrap()["user"], Value::from("admin"));
    }

    #[test]
    fn test_structured_requires_mapping() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("list.yaml"), "- a\n- b\n").unwrap();

        let provider = FileProvider::new(Some(dir.path().to_path_buf()));
        let result = provider.fetch_structured("list.yaml");
        assert!(matches!(
            result,
            Err(ProviderError::Document(DocumentError::NotAMapping("sequence")))
        ));
    }

    #[test]
    fn test_missing_file() {
        let provider = FileProvider::default();
        let result = provider.fetch_value("/nonexistent/path/secret");
        assert!(matches!(
            result,
            Err(ProviderError::Document(DocumentError::FileNotFound(_)))
        ));
    }
}
