use serde::{Deserialize, Serialize};

use crate::reference::Kind;

/// Evaluation options, deserializable from an embedding application's own config.
///
/// ```toml
/// only = ["ref"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Reference kinds to expand. Empty expands every kind.
    pub only: Vec<Kind>,
}
