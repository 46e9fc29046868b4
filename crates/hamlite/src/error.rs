//! Error types for hamlite.

use thiserror::Error;

// Re-export Location from hamlite-ast
pub use hamlite_ast::Location;

/// All errors that can occur in hamlite
#[derive(Error, Debug)]
pub enum HamliteError {
    #[error("Parse error at line {}, column {}: {message}", location.line, location.column)]
    ParseError {
        message: String,
        location: Location,
    },

    #[error("Type error: {message}")]
    TypeError { message: String },

    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },

    #[error("Load error: {message}")]
    LoadError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<hamlite_ast::ParseError> for HamliteError {
    fn from(error: hamlite_ast::ParseError) -> Self {
        HamliteError::ParseError {
            location: error.location(),
            message: error.to_string(),
        }
    }
}

/// Result type alias for hamlite operations
pub type Result<T> = std::result::Result<T, HamliteError>;
