//! Per-run memoization of provider fetches.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, trace};

use super::fragment;
use crate::document::{Mapping, Value};
use crate::provider::{ProviderError, ProviderRouter};
use crate::reference::Reference;
use crate::Error;

/// Whole-value and structured-fetch caches for one evaluation run.
///
/// Whole values are keyed by the exact reference target. Structured fetches
/// are keyed by the target without its fragment, so any number of fragment
/// lookups into one secret cost a single backend call. Failed fetches are
/// never cached.
#[derive(Debug, Default)]
pub(crate) struct ResolutionCache {
    values: HashMap<String, String>,
    documents: HashMap<String, Mapping>,
}

impl ResolutionCache {
    pub(crate) fn resolve(
        &mut self,
        router: &mut ProviderRouter,
        reference: &Reference,
    ) -> Result<Value, Error> {
        let path = reference.lookup_path();
        let fragment = reference.lookup_fragment();

        if fragment.is_empty() {
            return self.value(router, reference, &path).map(Value::String);
        }

        let document = self.document(router, reference, &path)?;
        fragment::select(document, fragment)
    }

    fn value(
        &mut self,
        router: &mut ProviderRouter,
        reference: &Reference,
        path: &str,
    ) -> Result<String, Error> {
        let key = reference.target();
        if let Some(value) = self.values.get(key) {
            trace!(reference = %key, "value cache hit");
            return Ok(value.clone());
        }

        let provider = router.resolve(reference.scheme(), reference.query())?;
        debug!(scheme = %reference.scheme(), path = %path, "fetching value");
        let value = provider
            .fetch_value(path)
            .map_err(|source| fetch_error(reference, path, "fetch_value", source))?;

        self.values.insert(key.to_string(), value.clone());
        Ok(value)
    }

    fn document(
        &mut self,
        router: &mut ProviderRouter,
        reference: &Reference,
        path: &str,
    ) -> Result<&Mapping, Error> {
        match self.documents.entry(reference.root_target().to_string()) {
            Entry::Occupied(entry) => {
                trace!(reference = %entry.key(), "structured cache hit");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let provider = router.resolve(reference.scheme(), reference.query())?;
                debug!(scheme = %reference.scheme(), path = %path, "fetching structured value");
                let document = provider
                    .fetch_structured(path)
                    .map_err(|source| fetch_error(reference, path, "fetch_structured", source))?;
                Ok(entry.insert(document))
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.values.len() + self.documents.len()
    }
}

fn fetch_error(
    reference: &Reference,
    path: &str,
    operation: &'static str,
    source: ProviderError,
) -> Error {
    match source {
        ProviderError::Unsupported => Error::UnsupportedOperation {
            scheme: reference.scheme().to_string(),
            operation,
        },
        source => Error::Fetch {
            path: path.to_string(),
            source,
        },
    }
}
