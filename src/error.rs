use thiserror::Error;

use crate::document::DocumentError;
use crate::provider::ProviderError;

/// Top-level error type for the dragon-refs library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("malformed reference '{reference}': {reason}")]
    Parse { reference: String, reason: String },

    #[error("no provider registered for scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("failed to initialize provider for scheme '{scheme}': {source}")]
    ProviderInit {
        scheme: String,
        source: ProviderError,
    },

    #[error("failed to fetch '{path}': {source}")]
    Fetch { path: String, source: ProviderError },

    #[error("no value found for key {fragment}")]
    FragmentNotFound { fragment: String },

    #[error("unexpected {found} value for key '{key}' in '{fragment}': expected a mapping")]
    DepthMismatch {
        key: String,
        fragment: String,
        found: &'static str,
    },

    #[error("{operation} is not supported for provider '{scheme}'")]
    UnsupportedOperation {
        scheme: String,
        operation: &'static str,
    },

    #[error("'{0}' resolved to a structured value and cannot be embedded in a string")]
    NonScalarReference(String),

    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    #[error("failed to resolve '{reference}': {source}")]
    Reference {
        reference: String,
        source: Box<Error>,
    },
}

impl Error {
    /// Attaches the originating reference, unless one is already attached.
    pub fn in_reference(self, reference: &str) -> Self {
        match self {
            Error::Reference { .. } => self,
            source => Error::Reference {
                reference: reference.to_string(),
                source: Box::new(source),
            },
        }
    }

    /// The underlying failure with any reference context removed.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Reference { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_reference_wraps_once() {
        let err = Error::UnsupportedScheme("vault".to_string())
            .in_reference("vault://a")
            .in_reference("vault://b");
        assert!(matches!(&err, Error::Reference { reference, .. } if reference == "vault://a"));
        assert!(matches!(err.root_cause(), Error::UnsupportedScheme(_)));
        assert_eq!(
            err.to_string(),
            "failed to resolve 'vault://a': no provider registered for scheme 'vault'"
        );
    }
}
