use super::{Provider, ProviderError};

/// Returns the requested path as its own value.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoProvider;

impl Provider for EchoProvider {
    fn fetch_value(&self, path: &str) -> Result<String, ProviderError> {
        Ok(path.to_string())
    }
}
