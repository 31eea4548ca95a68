//! Error types for sqltest-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Connection URL not understood by the connector (D003)
    #[error("[D003] Unsupported connection URL '{url}': {reason}")]
    UnsupportedUrl { url: String, reason: String },

    /// Query returned no rows (D004)
    #[error("[D004] Query returned no rows; expected a single row with a `failures` column")]
    EmptyResult,

    /// Invalid engine option (D005)
    #[error("[D005] Invalid connection option '{key}': {message}")]
    InvalidOption { key: String, message: String },

    /// Mutex poisoned (D006)
    #[error("[D006] Database mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        match err {
            duckdb::Error::QueryReturnedNoRows => DbError::EmptyResult,
            other => DbError::ExecutionError(other.to_string()),
        }
    }
}
