//! Error types shared by every likesql adapter.
//!
//! Adapters translate their engine-specific failures into a [`QueryError`]
//! carrying a stable [`ErrorCode`], so calling code can branch on the code
//! instead of on engine error strings. The engine error itself is kept as
//! the error `source`.
//!
//! # Error Codes
//!
//! Codes follow the pattern `L{category}{number}`:
//! - 2xxx: Constraint violations
//! - 3xxx: Connection errors
//! - 5xxx: Execution errors
//! - 6xxx: Data errors
//! - 7xxx: Configuration errors
//! - 9xxx: Internal errors
//!
//! ```rust
//! use likesql_query::{ErrorCode, QueryError};
//!
//! let err = QueryError::duplicate_entry("UNIQUE constraint failed: users.email");
//! assert_eq!(err.code, ErrorCode::DuplicateEntry);
//! assert_eq!(err.code.code(), "L2001");
//! assert!(err.is_duplicate_entry());
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Constraint errors (2xxx)
    /// A row with the same unique key already exists (L2001).
    DuplicateEntry = 2001,

    // Connection errors (3xxx)
    /// Opening the database failed (L3001).
    ConnectionFailed = 3001,
    /// The connection was closed before the call (L3002).
    ConnectionClosed = 3002,

    // Execution errors (5xxx)
    /// Invalid parameter or statement input (L5003).
    InvalidParameter = 5003,
    /// General database error (L5005).
    DatabaseError = 5005,
    /// The engine cannot perform this operation (L5006).
    Unsupported = 5006,

    // Data errors (6xxx)
    /// A row could not be converted into the requested type (L6003).
    DeserializationError = 6003,

    // Configuration errors (7xxx)
    /// Invalid configuration (L7001).
    InvalidConfiguration = 7001,

    // Internal errors (9xxx)
    /// Internal error (L9001).
    Internal = 9001,
}

impl ErrorCode {
    /// Get the error code string (e.g., "L2001").
    pub fn code(&self) -> String {
        format!("L{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::DuplicateEntry => "Duplicate entry",
            Self::ConnectionFailed => "Database connection failed",
            Self::ConnectionClosed => "Connection closed",
            Self::InvalidParameter => "Invalid parameter",
            Self::DatabaseError => "Database error",
            Self::Unsupported => "Unsupported operation",
            Self::DeserializationError => "Deserialization error",
            Self::InvalidConfiguration => "Invalid configuration",
            Self::Internal => "Internal error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that was being performed.
    pub operation: Option<String>,
    /// The table involved.
    pub table: Option<String>,
    /// The SQL statement (if available).
    pub sql: Option<String>,
}

/// Errors that can occur during query operations.
#[derive(Error, Debug)]
pub struct QueryError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
    /// The source error (if any).
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl QueryError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add context about the operation.
    pub fn with_context(mut self, operation: impl Into<String>) -> Self {
        self.context.operation = Some(operation.into());
        self
    }

    /// Set the table.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.context.table = Some(table.into());
        self
    }

    /// Set the SQL statement.
    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.context.sql = Some(sql.into());
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // ============== Constructor Functions ==============

    /// Create a duplicate entry error from the engine's message.
    pub fn duplicate_entry(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DuplicateEntry, message)
    }

    /// Create an unsupported-operation error.
    pub fn unsupported(operation: impl Into<String>, engine: &str) -> Self {
        let operation = operation.into();
        Self::new(
            ErrorCode::Unsupported,
            format!("{} is not supported by {}", operation, engine),
        )
        .with_context(operation)
    }

    /// Create an invalid input error.
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidParameter,
            format!("Invalid input for {}: {}", field.into(), message.into()),
        )
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ConnectionFailed,
            format!("Connection error: {}", message.into()),
        )
    }

    /// Create a connection closed error.
    pub fn closed() -> Self {
        Self::new(ErrorCode::ConnectionClosed, "Connection is closed")
    }

    /// Create a general database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Create a deserialization error.
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::DeserializationError,
            format!("Failed to deserialize result: {}", message.into()),
        )
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidConfiguration,
            format!("Configuration error: {}", message.into()),
        )
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, format!("Internal error: {}", message.into()))
    }

    // ============== Error Checks ==============

    /// Check if this is a duplicate entry error.
    pub fn is_duplicate_entry(&self) -> bool {
        self.code == ErrorCode::DuplicateEntry
    }

    /// Check if the operation is unsupported by the engine.
    pub fn is_unsupported(&self) -> bool {
        self.code == ErrorCode::Unsupported
    }

    /// Check if this is a connection error.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::ConnectionFailed | ErrorCode::ConnectionClosed
        )
    }

    /// Borrow the engine error this error was built from, if it has that type.
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_deref().and_then(|e| e.downcast_ref::<E>())
    }

    /// Display the error with its context on separate lines.
    pub fn display_full(&self) -> String {
        let mut output = format!("Error [{}]: {}\n", self.code.code(), self.message);

        if let Some(ref op) = self.context.operation {
            output.push_str(&format!("  -> While: {}\n", op));
        }
        if let Some(ref table) = self.context.table {
            output.push_str(&format!("  -> Table: {}\n", table));
        }
        if let Some(ref sql) = self.context.sql {
            let sql_display = if sql.len() > 200 {
                let end = (0..=200).rev().find(|i| sql.is_char_boundary(*i)).unwrap_or(0);
                format!("{}...", &sql[..end])
            } else {
                sql.clone()
            };
            output.push_str(&format!("  -> SQL: {}\n", sql_display));
        }
        if let Some(ref source) = self.source {
            output.push_str(&format!("  -> Caused by: {}\n", source));
        }

        output
    }
}
