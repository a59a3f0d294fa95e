//! Error types for jsql.

use serde::Serialize;
use thiserror::Error;

/// The main error type for jsql operations.
#[derive(Debug, Error)]
pub enum JsqlError {
    /// A query spec (or its `where` clause) was a string that is not valid JSON.
    #[error("Parse error in {context}: {message}")]
    Parse { context: &'static str, message: String },

    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A model schema violates a structural invariant.
    #[error("Schema error in '{model}': {message}")]
    Schema { model: String, message: String },

    /// The requested model is not registered.
    #[error("Unknown model: '{0}'")]
    UnknownModel(String),

    /// An update carried no keys that map to declared properties.
    #[error("Update on '{0}' has no assignable properties")]
    EmptyUpdate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl JsqlError {
    /// Create a parse error for the given input context.
    pub fn parse(context: &'static str, message: impl Into<String>) -> Self {
        Self::Parse {
            context,
            message: message.into(),
        }
    }

    /// Create a schema error for the given model.
    pub fn schema(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            model: model.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for jsql operations.
pub type JsqlResult<T> = Result<T, JsqlError>;

/// Message carried by every insert validation failure.
pub const MISSING_FIELDS_MESSAGE: &str = "Missing or Invalid Fields";

/// Returned (never raised) when an insert lacks required properties.
///
/// Serializes as `{"error": [...], "message": "Missing or Invalid Fields"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}: {}", error.join(", "))]
pub struct FieldValidationError {
    pub error: Vec<String>,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            error: fields,
            message: MISSING_FIELDS_MESSAGE.to_string(),
        }
    }
}
