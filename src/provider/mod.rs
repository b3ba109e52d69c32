//! Provider capability and the scheme-indexed provider router.
//!
//! Modules:
//! - `router`: factory table plus memoized provider instances
//! - `echo`, `env`, `file`: local providers registered by default

mod echo;
mod env;
mod error;
mod file;
mod router;

use std::fmt::Debug;

use crate::config::Config;
use crate::document::Mapping;

pub use echo::EchoProvider;
pub use env::EnvProvider;
pub use error::ProviderError;
pub use file::FileProvider;
pub use router::{provider_key, ProviderRouter};

/// A backend that reference targets are resolved against.
///
/// Providers that support only one of the two operations leave the other at
/// its default, which reports [`ProviderError::Unsupported`].
pub trait Provider: Send + Sync + Debug {
    /// Fetches the raw value at `path`.
    fn fetch_value(&self, path: &str) -> Result<String, ProviderError> {
        let _ = path;
        Err(ProviderError::Unsupported)
    }

    /// Fetches the structured value at `path`, used when a fragment indexes into it.
    fn fetch_structured(&self, path: &str) -> Result<Mapping, ProviderError> {
        let _ = path;
        Err(ProviderError::Unsupported)
    }
}

/// Constructs a provider from the configuration carried by a reference's query.
pub type ProviderFactory =
    Box<dyn Fn(&Config) -> Result<Box<dyn Provider>, ProviderError> + Send + Sync>;
