pub mod config;
pub mod document;
pub mod expand;
pub mod provider;
pub mod reference;
pub mod runtime;
mod error;

pub use config::{Config, ConfigError};
pub use document::{DocumentError, Mapping, Value};
pub use error::Error;
pub use provider::{Provider, ProviderError, ProviderFactory, ProviderRouter};
pub use reference::{Kind, Reference};
pub use runtime::{Options, Runtime, RuntimeBuilder};
