use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("missing required config key '{0}'")]
    MissingKey(String),

    #[error("config key '{key}' must be a {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid value for config key '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}
