//! Read-only configuration handed to provider factories.
//!
//! A reference's query parameters become a [`Config`]: `?address=x&auth.role=y`
//! yields `address` and a nested `auth` section. A parameter given more than
//! once becomes a list.

mod error;

pub use error::ConfigError;

use crate::document::{Mapping, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    values: Mapping,
}

impl Config {
    pub fn new(values: Mapping) -> Self {
        Self { values }
    }

    /// Builds a config from decoded query parameters.
    ///
    /// Dotted keys are split into nested sections.
    pub fn from_query(query: &[(String, String)]) -> Self {
        let mut flat = Mapping::new();
        for (key, value) in query {
            let value = Value::from(value.as_str());
            match flat.get_mut(key) {
                Some(Value::Sequence(items)) => items.push(value),
                Some(existing) => {
                    let first = std::mem::take(existing);
                    *existing = Value::Sequence(vec![first, value]);
                }
                None => {
                    flat.insert(key.clone(), value);
                }
            }
        }

        let mut values = Mapping::new();
        for (key, value) in flat {
            let path: Vec<String> = key.split('.').map(str::to_string).collect();
            insert_at_path(&mut values, &path, value);
        }
        Self { values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn exists(&self, keys: &[&str]) -> bool {
        self.lookup(keys).is_some()
    }

    /// Returns the scalar at `keys` as text.
    pub fn get_string(&self, keys: &[&str]) -> Option<String> {
        self.lookup(keys).and_then(Value::scalar_text)
    }

    /// Like [`get_string`](Self::get_string), but a missing or non-scalar key is an error.
    pub fn require_string(&self, keys: &[&str]) -> Result<String, ConfigError> {
        let value = self
            .lookup(keys)
            .ok_or_else(|| ConfigError::MissingKey(keys.join(".")))?;
        value.scalar_text().ok_or_else(|| ConfigError::TypeMismatch {
            key: keys.join("."),
            expected: "string",
            found: value.type_name(),
        })
    }

    /// Returns the list at `keys`. A single scalar is split on commas.
    /// Missing keys yield an empty list.
    pub fn get_string_list(&self, keys: &[&str]) -> Vec<String> {
        match self.lookup(keys) {
            Some(Value::Sequence(items)) => items.iter().filter_map(Value::scalar_text).collect(),
            Some(value) => value
                .scalar_text()
                .map(|text| {
                    text.split(',')
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Returns the section at `keys`, or an empty config when absent.
    pub fn get_sub_config(&self, keys: &[&str]) -> Config {
        match self.lookup(keys) {
            Some(Value::Mapping(map)) => Config::new(map.clone()),
            _ => Config::default(),
        }
    }

    fn lookup(&self, keys: &[&str]) -> Option<&Value> {
        let (first, rest) = keys.split_first()?;
        let mut current = self.values.get(*first)?;
        for key in rest {
            current = current.as_mapping()?.get(*key)?;
        }
        Some(current)
    }
}

impl From<Mapping> for Config {
    fn from(values: Mapping) -> Self {
        Self::new(values)
    }
}

/// Inserts `value` at a nested `path`, creating sections as needed.
///
/// A non-mapping value in the way of the path is replaced by a section.
pub(crate) fn insert_at_path(map: &mut Mapping, path: &[String], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };

    if rest.is_empty() {
        map.insert(first.clone(), value);
        return;
    }

    if !matches!(map.get(first), Some(Value::Mapping(_))) {
        map.insert(first.clone(), Value::Mapping(Mapping::new()));
    }
    if let Some(Value::Mapping(nested)) = map.get_mut(first) {
        insert_at_path(nested, rest, value);
    }
}
