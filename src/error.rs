//! Error types for textsql.

use thiserror::Error;

/// The two outcomes that stop a translation.
///
/// `Display` yields the exact diagnostic sentence handed back to callers of
/// [`crate::translate`], so presentation layers can print it verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// Input was empty or whitespace only.
    #[error("Empty input.")]
    EmptyInput,

    /// No table name or fallback keyword was recognized.
    #[error("Could not detect table.")]
    NoTable,
}

/// Errors raised while loading configuration or a schema definition.
#[derive(Debug, Error)]
pub enum TextSqlError {
    /// The schema definition is structurally invalid.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// A TOML document could not be decoded.
    #[error("Failed to parse {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TextSqlError {
    /// Create a schema validation error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::InvalidSchema(message.into())
    }

    /// Wrap a TOML decode error with the document it came from.
    pub fn toml(path: impl Into<String>, source: toml::de::Error) -> Self {
        Self::Toml {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for textsql operations.
pub type TextSqlResult<T> = Result<T, TextSqlError>;
