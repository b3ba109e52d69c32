//! Evaluation runtime: provider router, caches and expansion in one place.

mod cache;
mod fragment;
mod options;

use std::fmt;

use indexmap::IndexMap;

pub use options::Options;

use self::cache::ResolutionCache;
use crate::config::Config;
use crate::document::Value;
use crate::expand::{rewrite, Matcher};
use crate::provider::{Provider, ProviderError, ProviderFactory, ProviderRouter};
use crate::reference::{Kind, Reference};
use crate::Error;

/// State for one evaluation run.
///
/// A runtime owns the provider router and both resolution caches. Build one
/// per evaluation and drop it afterwards; nothing is shared between runtimes.
/// Resolution is synchronous: each provider call blocks until it returns.
///
/// ## Example
///
/// ```no_run
/// use dragon_refs::{Runtime, Value};
///
/// let doc = Value::from_yaml_str("greeting: ref+echo://hello")?;
/// let resolved = Runtime::new().eval(doc)?;
/// assert_eq!(resolved, Value::from_yaml_str("greeting: hello")?);
/// # Ok::<(), dragon_refs::Error>(())
/// ```
#[derive(Debug)]
pub struct Runtime {
    matcher: Matcher,
    router: ProviderRouter,
    cache: ResolutionCache,
}

impl Runtime {
    /// Creates a runtime with the built-in providers and no kind filter.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::default()
    }

    /// Resolves every reference in `doc`, returning a document of the same shape.
    ///
    /// The first failure aborts the evaluation; no partial document is returned.
    pub fn eval(&mut self, doc: Value) -> Result<Value, Error> {
        rewrite(doc, &mut |s: &str| self.expand_leaf(s))
    }

    /// Expands every allowed reference embedded in `s`.
    pub fn eval_str(&mut self, s: &str) -> Result<String, Error> {
        let Self {
            matcher,
            router,
            cache,
        } = self;
        matcher.expand(s, |target| embed(router, cache, target))
    }

    /// Expands each value of a flat name-to-string map, such as an environment.
    pub fn eval_env(
        &mut self,
        env: IndexMap<String, String>,
    ) -> Result<IndexMap<String, String>, Error> {
        env.into_iter()
            .map(|(name, value)| Ok((name, self.eval_str(&value)?)))
            .collect()
    }

    /// Resolves a single reference, given with or without its kind prefix.
    ///
    /// The kind filter does not apply here.
    pub fn get(&mut self, reference: &str) -> Result<Value, Error> {
        let reference = Reference::parse(reference)?;
        self.cache.resolve(&mut self.router, &reference)
    }

    /// Number of provider instances constructed during this run.
    pub fn provider_count(&self) -> usize {
        self.router.instance_count()
    }

    /// A leaf that is exactly one reference takes the resolved value as is,
    /// which may be a whole sub-document. Otherwise references are embedded
    /// as text.
    fn expand_leaf(&mut self, s: &str) -> Result<Value, Error> {
        if let Some(target) = self.matcher.whole_reference(s) {
            return resolve_target(&mut self.router, &mut self.cache, target);
        }
        self.eval_str(s).map(Value::String)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_target(
    router: &mut ProviderRouter,
    cache: &mut ResolutionCache,
    target: &str,
) -> Result<Value, Error> {
    Reference::parse(target)
        .and_then(|reference| cache.resolve(router, &reference))
        .map_err(|err| err.in_reference(target))
}

fn embed(
    router: &mut ProviderRouter,
    cache: &mut ResolutionCache,
    target: &str,
) -> Result<String, Error> {
    resolve_target(router, cache, target)?
        .scalar_text()
        .ok_or_else(|| Error::NonScalarReference(target.to_string()).in_reference(target))
}

/// Builder for a [`Runtime`].
///
/// Starts with the built-in `echo`, `env` and `file` providers. Providers
/// registered with [`with_provider`](Self::with_provider) replace a built-in
/// of the same scheme.
#[must_use = "builders do nothing until .build() is called"]
pub struct RuntimeBuilder {
    options: Options,
    providers: Vec<(String, ProviderFactory)>,
    builtins: bool,
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self {
            options: Options::default(),
            providers: Vec::new(),
            builtins: true,
        }
    }
}

impl RuntimeBuilder {
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Restricts expansion to the given kinds. Tokens of other kinds are left as written.
    pub fn only(mut self, kinds: impl IntoIterator<Item = Kind>) -> Self {
        self.options.only = kinds.into_iter().collect();
        self
    }

    /// Registers a provider factory for `scheme`.
    pub fn with_provider<F>(mut self, scheme: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Config) -> Result<Box<dyn Provider>, ProviderError> + Send + Sync + 'static,
    {
        self.providers.push((scheme.into(), Box::new(factory)));
        self
    }

    /// Leaves out the built-in providers.
    pub fn without_builtins(mut self) -> Self {
        self.builtins = false;
        self
    }

    pub fn build(self) -> Runtime {
        let mut router = if self.builtins {
            ProviderRouter::with_builtins()
        } else {
            ProviderRouter::new()
        };
        for (scheme, factory) in self.providers {
            router.register_boxed(scheme, factory);
        }

        Runtime {
            matcher: Matcher::new(self.options.only),
            router,
            cache: ResolutionCache::default(),
        }
    }
}

impl fmt::Debug for RuntimeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schemes: Vec<&str> = self.providers.iter().map(|(s, _)| s.as_str()).collect();
        f.debug_struct("RuntimeBuilder")
            .field("options", &self.options)
            .field("providers", &schemes)
            .field("builtins", &self.builtins)
            .finish()
    }
}

#[cfg(test)]
mod tests;
