//! Maps a scheme and query to a memoized provider instance.

use std::collections::hash_map::{DefaultHasher, Entry};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::debug;

use super::{EchoProvider, EnvProvider, FileProvider, Provider, ProviderError, ProviderFactory};
use crate::config::Config;
use crate::Error;

/// Scheme-indexed factory table plus the provider instances built so far.
///
/// References sharing a scheme and query (in any parameter order) share one
/// provider instance for the life of the router.
#[derive(Default)]
pub struct ProviderRouter {
    factories: HashMap<String, ProviderFactory>,
    instances: HashMap<String, Box<dyn Provider>>,
}

impl ProviderRouter {
    /// Creates a router with no factories registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a router with the local `echo`, `env` and `file` providers registered.
    pub fn with_builtins() -> Self {
        let mut router = Self::new();
        router.register("echo", |_: &Config| -> Result<Box<dyn Provider>, ProviderError> {
            Ok(Box::new(EchoProvider))
        });
        router.register("env", |config: &Config| -> Result<Box<dyn Provider>, ProviderError> {
            Ok(Box::new(EnvProvider::from_config(config)?))
        });
        router.register("file", |config: &Config| -> Result<Box<dyn Provider>, ProviderError> {
            Ok(Box::new(FileProvider::from_config(config)))
        });
        router
    }

    /// Registers the factory for `scheme`, replacing any earlier one.
    pub fn register<F>(&mut self, scheme: impl Into<String>, factory: F)
    where
        F: Fn(&Config) -> Result<Box<dyn Provider>, ProviderError> + Send + Sync + 'static,
    {
        self.factories.insert(scheme.into(), Box::new(factory));
    }

    pub(crate) fn register_boxed(&mut self, scheme: String, factory: ProviderFactory) {
        self.factories.insert(scheme, factory);
    }

    pub fn has_scheme(&self, scheme: &str) -> bool {
        self.factories.contains_key(scheme)
    }

    /// Number of provider instances constructed so far.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Returns the provider for `scheme` and `query`, constructing it on first use.
    pub fn resolve(
        &mut self,
        scheme: &str,
        query: &[(String, String)],
    ) -> Result<&dyn Provider, Error> {
        let provider = match self.instances.entry(provider_key(scheme, query)) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let factory = self
                    .factories
                    .get(scheme)
                    .ok_or_else(|| Error::UnsupportedScheme(scheme.to_string()))?;
                let provider = factory(&Config::from_query(query)).map_err(|source| {
                    Error::ProviderInit {
                        scheme: scheme.to_string(),
                        source,
                    }
                })?;
                debug!(
                    scheme = %scheme,
                    key = %entry.key(),
                    parameter_count = query.len(),
                    "provider constructed"
                );
                entry.insert(provider)
            }
        };
        Ok(&**provider)
    }
}

impl fmt::Debug for ProviderRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut schemes: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        schemes.sort_unstable();
        f.debug_struct("ProviderRouter")
            .field("schemes", &schemes)
            .field("instances", &self.instances)
            .finish()
    }
}

/// Builds the instance key for a scheme and its query parameters.
///
/// Parameters are sorted before hashing, so their order in the reference does
/// not matter.
pub fn provider_key(scheme: &str, query: &[(String, String)]) -> String {
    let mut pairs: Vec<&(String, String)> = query.iter().collect();
    pairs.sort();

    let mut canonical = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        canonical.append_pair(key, value);
    }

    let mut hasher = DefaultHasher::new();
    scheme.hash(&mut hasher);
    canonical.finish().hash(&mut hasher);
    format!("{}:{:016x}", scheme, hasher.finish())
}
