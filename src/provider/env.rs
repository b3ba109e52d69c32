//! Provider reading values from environment variables.

use indexmap::IndexMap;

use super::{Provider, ProviderError};
use crate::config::{insert_at_path, Config, ConfigError};
use crate::document::{Mapping, Value};

const DEFAULT_SEPARATOR: &str = "__";

/// Resolves `ref+env://NAME` to a variable, and `ref+env://PREFIX#/a/b` by
/// collecting every `PREFIX__A__B` variable into a nested mapping whose
/// lowercased segments come from splitting the name on the separator.
/// Collected values are coerced to booleans and numbers where they look like one.
///
/// Variables come from the process environment unless a fixed set is given
/// with [`with_vars`](Self::with_vars).
#[derive(Debug, Clone)]
pub struct EnvProvider {
    separator: String,
    variables: Variables,
}

#[derive(Debug, Clone)]
enum Variables {
    Process,
    Fixed(IndexMap<String, String>),
}

impl EnvProvider {
    pub fn new(separator: impl Into<String>) -> Result<Self, ProviderError> {
        let separator = separator.into();
        if separator.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "separator".to_string(),
                reason: "separator must not be empty".to_string(),
            }
            .into());
        }
        Ok(Self {
            separator,
            variables: Variables::Process,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let separator = config
            .get_string(&["separator"])
            .unwrap_or_else(|| DEFAULT_SEPARATOR.to_string());
        Self::new(separator)
    }

    /// Reads from `vars` instead of the process environment.
    pub fn with_vars<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.variables = Variables::Fixed(vars);
        self
    }

    fn var(&self, name: &str) -> Option<String> {
        match &self.variables {
            Variables::Process => std::env::var(name).ok(),
            Variables::Fixed(vars) => vars.get(name).cloned(),
        }
    }

    /// Every variable whose name and value are valid UTF-8.
    fn vars(&self) -> Vec<(String, String)> {
        match &self.variables {
            Variables::Process => std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
            Variables::Fixed(vars) => vars.clone().into_iter().collect(),
        }
    }
}

impl Default for EnvProvider {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            variables: Variables::Process,
        }
    }
}

impl Provider for EnvProvider {
    fn fetch_value(&self, path: &str) -> Result<String, ProviderError> {
        self.var(path)
            .ok_or_else(|| ProviderError::NotFound(path.to_string()))
    }

    fn fetch_structured(&self, path: &str) -> Result<Mapping, ProviderError> {
        let prefix = format!("{}{}", path, self.separator);
        let mut mapping = Mapping::new();

        for (name, value) in self.vars() {
            let Some(rest) = name.strip_prefix(&prefix).filter(|rest| !rest.is_empty()) else {
                continue;
            };
            let segments: Vec<String> = rest
                .split(&self.separator)
                .map(str::to_lowercase)
                .collect();
            insert_at_path(&mut mapping, &segments, coerce_value(&value));
        }

        if mapping.is_empty() {
            return Err(ProviderError::NotFound(prefix));
        }
        Ok(mapping)
    }
}

fn coerce_value(s: &str) -> Value {
    if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false") {
        return Value::Bool(s.eq_ignore_ascii_case("true"));
    }
    // Plain digit runs only; "+1" and "1e3" stay strings.
    if is_integer_literal(s) {
        if let Ok(i) = s.parse() {
            return Value::Integer(i);
        }
    }
    // A decimal point is required, so "inf" and "NaN" stay strings.
    match s.contains('.').then(|| s.parse()) {
        Some(Ok(f)) => Value::Float(f),
        _ => Value::String(s.to_string()),
    }
}

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
