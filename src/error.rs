//! Error handling for the entity synonym mapper
//!
//! Conflicting synonyms and missing persisted tables are not errors: they are
//! logged and recovered from. Everything here is a hard failure.

use thiserror::Error;

/// Main error type for the synonym mapper
#[derive(Error, Debug)]
pub enum SynonymError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {field}: {message}")]
    InvalidConfig { field: &'static str, message: String },

    #[error("Malformed entity occurrence: {0}")]
    MalformedOccurrence(String),

    #[error("Malformed training data: {0}")]
    MalformedTrainingData(String),
}

impl SynonymError {
    pub(crate) fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        SynonymError::InvalidConfig {
            field,
            message: message.into(),
        }
    }
}

/// Result type alias for synonym mapper operations
pub type Result<T> = std::result::Result<T, SynonymError>;
