//! SQL text with positional `?` parameters.
//!
//! Every statement template produces a [`Sql`], and every adapter executes
//! one. Values are always bound, never interpolated into the text.
//!
//! ```rust
//! use likesql_query::Sql;
//!
//! let sql = Sql::new("SELECT * FROM users WHERE id = ").bind(42);
//! assert_eq!(sql.sql(), "SELECT * FROM users WHERE id = ?");
//! assert_eq!(sql.param_count(), 1);
//! ```
//!
//! # Using the raw_query! Macro
//!
//! ```rust
//! use likesql_query::raw_query;
//!
//! let malicious = "'; DROP TABLE users; --";
//! let sql = raw_query!("SELECT * FROM users WHERE name = {} AND age > {}", malicious, 21);
//!
//! assert_eq!(sql.sql(), "SELECT * FROM users WHERE name = ? AND age > ?");
//! assert!(!sql.sql().contains("DROP TABLE"));
//! ```

use tracing::trace;

use crate::value::Value;

/// A SQL statement (or fragment) and its bound parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sql {
    text: String,
    params: Vec<Value>,
}

impl Sql {
    /// Create a new SQL statement without parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            text: sql.into(),
            params: Vec::new(),
        }
    }

    /// Create an empty statement.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a statement from text that already contains `?` placeholders.
    pub fn with_params(sql: impl Into<String>, params: impl IntoIterator<Item = Value>) -> Self {
        Self {
            text: sql.into(),
            params: params.into_iter().collect(),
        }
    }

    /// Append a literal SQL string.
    pub fn push(mut self, sql: impl AsRef<str>) -> Self {
        self.text.push_str(sql.as_ref());
        self
    }

    /// Append a `?` placeholder and bind its value.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.text.push('?');
        self.params.push(value.into());
        self
    }

    /// Bind several values, separating their placeholders with `, `.
    pub fn bind_many(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self.text.push_str(", ");
            }
            self = self.bind(value);
        }
        self
    }

    /// Append a conditional clause.
    pub fn push_if(self, condition: bool, sql: impl AsRef<str>) -> Self {
        if condition { self.push(sql) } else { self }
    }

    /// Push SQL and bind a value together.
    pub fn push_bind(self, sql: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.push(sql).bind(value)
    }

    /// Append another statement, keeping its parameters in order.
    pub fn append(mut self, other: Sql) -> Self {
        self.text.push_str(&other.text);
        self.params.extend(other.params);
        self
    }

    /// Build the final SQL string and parameters.
    pub fn build(self) -> (String, Vec<Value>) {
        trace!(sql_len = self.text.len(), param_count = self.params.len(), "Sql::build()");
        (self.text, self.params)
    }

    /// Get the SQL string.
    pub fn sql(&self) -> &str {
        &self.text
    }

    /// Get the parameters.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Get the number of bound parameters.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Check if the statement has no text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl std::fmt::Display for Sql {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Sql {
    fn from(sql: &str) -> Self {
        Self::new(sql)
    }
}

impl From<String> for Sql {
    fn from(sql: String) -> Self {
        Self::new(sql)
    }
}

/// Create a [`Sql`] from a format-like string, replacing each `{}` with a
/// bound `?` parameter.
#[macro_export]
macro_rules! raw_query {
    ($sql:expr) => {
        $crate::raw::Sql::new($sql)
    };

    ($sql:expr, $($params:expr),+ $(,)?) => {{
        let parts: ::std::vec::Vec<&str> = $sql.split("{}").collect();
        let mut values = ::std::vec![$($crate::value::Value::from($params)),+].into_iter();

        let mut sql = $crate::raw::Sql::empty();
        for (i, part) in parts.iter().enumerate() {
            sql = sql.push(*part);
            if i + 1 < parts.len() {
                if let Some(value) = values.next() {
                    sql = sql.bind(value);
                }
            }
        }
        sql
    }};
}
