//! Error types for rowsql

use thiserror::Error;

/// Result type alias for rowsql operations
pub type Result<T> = std::result::Result<T, RowsqlError>;

/// Errors raised while describing records, building statements, or running them.
#[derive(Debug, Error)]
pub enum RowsqlError {
    /// The record representation could not be decoded into its typed record.
    #[error("Decode error: {cause}")]
    Decode {
        #[source]
        cause: serde_json::Error,
    },

    /// The record type carries no column metadata at all.
    #[error("Schema error: type '{type_name}' has no mapped columns")]
    Schema { type_name: String },

    /// A mutation mode token other than `insert` / `update`.
    #[error("Unsupported mutation mode: '{mode}'")]
    UnsupportedMode { mode: String },

    /// The statement needs a primary key predicate but the type tags none.
    #[error("Missing primary key: type '{type_name}' has no primary-key field")]
    MissingPrimaryKey { type_name: String },

    /// A result column could not be read into its field
    #[error("Column error on '{column}': {message}")]
    Column { column: String, message: String },

    /// Invalid identifier or other rejected input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration load/parse error
    #[error("Config error: {0}")]
    Config(String),

    /// Encoding a field value failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),
}

impl RowsqlError {
    /// Create a decode error wrapping the serde cause
    pub fn decode(cause: serde_json::Error) -> Self {
        Self::Decode { cause }
    }

    /// Create a schema error for a type
    pub fn schema(type_name: impl Into<String>) -> Self {
        Self::Schema {
            type_name: type_name.into(),
        }
    }

    /// Create an unsupported-mode error
    pub fn unsupported_mode(mode: impl Into<String>) -> Self {
        Self::UnsupportedMode { mode: mode.into() }
    }

    /// Create a missing-primary-key error for a type
    pub fn missing_primary_key(type_name: impl Into<String>) -> Self {
        Self::MissingPrimaryKey {
            type_name: type_name.into(),
        }
    }

    /// Create a column read error
    pub fn column(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Column {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a decode error
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Check if this is a schema error
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    /// Check if this is a missing primary key error
    pub fn is_missing_primary_key(&self) -> bool {
        matches!(self, Self::MissingPrimaryKey { .. })
    }

    /// Check if this is an unsupported mode error
    pub fn is_unsupported_mode(&self) -> bool {
        matches!(self, Self::UnsupportedMode { .. })
    }
}
