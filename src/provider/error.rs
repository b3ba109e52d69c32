use thiserror::Error;

use crate::config::ConfigError;
use crate::document::DocumentError;

/// Failure reported by a provider adapter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("operation not supported by this provider")]
    Unsupported,

    #[error("no value found at '{0}'")]
    NotFound(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl ProviderError {
    /// Wraps an arbitrary backend failure (network, auth, decoding).
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Backend(err.into())
    }
}
