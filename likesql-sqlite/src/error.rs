//! Error types for SQLite operations.

use likesql_query::error::QueryError;
use rusqlite::ffi;
use thiserror::Error;

/// Result type for SQLite operations.
pub type SqliteResult<T> = Result<T, SqliteError>;

/// Error type for SQLite operations.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// SQLite driver error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The connection was closed.
    #[error("Connection is closed")]
    Closed,

    /// Deserialization error.
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl SqliteError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a deserialization error.
    pub fn deserialization(msg: impl Into<String>) -> Self {
        Self::Deserialization(msg.into())
    }

    /// Whether the engine rejected a row for a unique or primary key conflict.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Sqlite(rusqlite::Error::SqliteFailure(failure, _)) => matches!(
                failure.extended_code,
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            ),
            _ => false,
        }
    }
}

impl From<tokio_rusqlite::Error> for SqliteError {
    fn from(err: tokio_rusqlite::Error) -> Self {
        match err {
            tokio_rusqlite::Error::ConnectionClosed => Self::Closed,
            tokio_rusqlite::Error::Close((_, e)) | tokio_rusqlite::Error::Rusqlite(e) => {
                Self::Sqlite(e)
            }
            other => Self::Connection(other.to_string()),
        }
    }
}

impl From<SqliteError> for QueryError {
    fn from(err: SqliteError) -> Self {
        if err.is_unique_violation() {
            return QueryError::duplicate_entry(sqlite_message(&err)).with_source(err);
        }
        match err {
            SqliteError::Sqlite(e)
                if e.sqlite_error_code() == Some(rusqlite::ErrorCode::CannotOpen) =>
            {
                QueryError::connection(e.to_string()).with_source(e)
            }
            SqliteError::Sqlite(e @ rusqlite::Error::MultipleStatement) => {
                QueryError::invalid_input("sql", "expected a single statement").with_source(e)
            }
            SqliteError::Sqlite(e) => QueryError::database(e.to_string()).with_source(e),
            SqliteError::Config(msg) => QueryError::configuration(msg),
            SqliteError::Connection(msg) => QueryError::connection(msg),
            SqliteError::Closed => QueryError::closed(),
            SqliteError::Deserialization(msg) => QueryError::deserialization(msg),
        }
    }
}

/// The engine's own message, without the variant prefix.
fn sqlite_message(err: &SqliteError) -> String {
    match err {
        SqliteError::Sqlite(rusqlite::Error::SqliteFailure(_, Some(msg))) => msg.clone(),
        SqliteError::Sqlite(e) => e.to_string(),
        other => other.to_string(),
    }
}
