use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::DocumentError;

/// Ordered string-keyed mapping. Inserting an existing key replaces its value
/// in place.
pub type Mapping = IndexMap<String, Value>;

/// A node of a parsed configuration document.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

impl Value {
    /// Parses a YAML document. JSON input is accepted as well.
    pub fn from_yaml_str(s: &str) -> Result<Self, DocumentError> {
        let raw: serde_yaml::Value = serde_yaml::from_str(s)?;
        Ok(raw.into())
    }

    pub fn from_json_str(s: &str) -> Result<Self, DocumentError> {
        let raw: serde_json::Value = serde_json::from_str(s)?;
        Ok(raw.into())
    }

    pub fn from_toml_str(s: &str) -> Result<Self, DocumentError> {
        let table: toml::Table = toml::from_str(s)?;
        Ok(toml::Value::Table(table).into())
    }

    pub fn to_yaml_string(&self) -> Result<String, DocumentError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Consumes the value, returning the mapping or an error naming what was found.
    pub fn into_mapping(self) -> Result<Mapping, DocumentError> {
        match self {
            Value::Mapping(map) => Ok(map),
            other => Err(DocumentError::NotAMapping(other.type_name())),
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Sequence(_) | Value::Mapping(_))
    }

    /// Renders a scalar as the text it would occupy inside a string.
    ///
    /// Returns `None` for sequences and mappings. Null renders as the empty string.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Value::Null => Some(String::new()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Sequence(_) | Value::Mapping(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value as Yaml;

        match value {
            Yaml::Null => Value::Null,
            Yaml::Bool(b) => Value::Bool(b),
            Yaml::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            Yaml::String(s) => Value::String(s),
            Yaml::Sequence(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            Yaml::Mapping(map) => Value::Mapping(
                map.into_iter()
                    .map(|(k, v)| (yaml_key(k), Value::from(v)))
                    .collect(),
            ),
            Yaml::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}

/// YAML allows non-string keys; they are rendered to their scalar text.
fn yaml_key(key: serde_yaml::Value) -> String {
    match Value::from(key) {
        Value::String(s) => s,
        Value::Null => "null".to_string(),
        other => other.scalar_text().unwrap_or_else(|| {
            serde_yaml::to_string(&other)
                .map(|s| s.trim_end().to_string())
                .unwrap_or_default()
        }),
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => {
                Value::Mapping(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        use toml::Value as Toml;

        match value {
            Toml::String(s) => Value::String(s),
            Toml::Integer(i) => Value::Integer(i),
            Toml::Float(f) => Value::Float(f),
            Toml::Boolean(b) => Value::Bool(b),
            Toml::Datetime(dt) => Value::String(dt.to_string()),
            Toml::Array(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            Toml::Table(table) => {
                Value::Mapping(table.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Sequence(items) => serializer.collect_seq(items),
            Value::Mapping(map) => serializer.collect_map(map),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_yaml::Value::deserialize(deserializer).map(Value::from)
    }
}
