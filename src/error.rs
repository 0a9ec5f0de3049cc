//! Error types for the generator

use thiserror::Error;

use crate::schema::SchemaHandle;

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GenError>;

/// Generator errors
///
/// Only fatal conditions live here. Unhandled shapes are logged and skipped
/// by the emitter instead of surfacing as errors.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("Unresolved id {id} in {schema} schema")]
    UnresolvedId { schema: SchemaHandle, id: u64 },

    #[error("Unresolved name `{name}` in {schema} schema{}", suggestion_suffix(.suggestions))]
    UnresolvedName {
        schema: SchemaHandle,
        name: String,
        suggestions: Vec<String>,
    },

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid exclusion pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

fn suggestion_suffix(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}
