//! The uniform result shapes every adapter returns.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{QueryError, QueryResult};

/// A result row keyed by column name.
pub type Row = serde_json::Map<String, JsonValue>;

/// Column metadata reported by a prepared statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Result column name (alias if one was given).
    pub name: String,
    /// Declared type of the source column, if the column maps to one.
    pub decl_type: Option<String>,
}

impl ColumnInfo {
    /// Create column metadata.
    pub fn new(name: impl Into<String>, decl_type: Option<String>) -> Self {
        Self {
            name: name.into(),
            decl_type,
        }
    }
}

/// Rows together with the columns that produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rows {
    /// The materialized rows.
    pub rows: Vec<Row>,
    /// The statement's result columns.
    pub columns: Vec<ColumnInfo>,
}

impl Rows {
    /// First column of the first row, if any.
    pub fn scalar(&self) -> Option<&JsonValue> {
        let first = self.columns.first()?;
        self.rows.first()?.get(&first.name)
    }

    /// Deserialize every row into `T`.
    pub fn deserialize<T: DeserializeOwned>(self) -> QueryResult<Vec<T>> {
        self.rows.into_iter().map(from_row).collect()
    }
}

/// Outcome of a statement that does not return rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInfo {
    /// Rows inserted, updated or deleted.
    pub changes: u64,
    /// Rowid of the most recent successful rowid-table insert on the connection.
    pub last_insert_rowid: i64,
}

/// Either the rows a reader statement produced or the run info of a writer.
#[derive(Debug, Clone, PartialEq)]
pub enum Execution {
    /// Rows returned by a statement with result columns.
    Rows(Vec<Row>),
    /// Run info of a statement without result columns.
    Info(RunInfo),
}

/// Raw pass-through result: `[rows-or-info, fields]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    /// Rows or run info.
    pub result: Execution,
    /// Result columns; `None` for statements that produce no rows.
    pub fields: Option<Vec<ColumnInfo>>,
}

impl Output {
    /// Wrap rows together with their fields.
    pub fn rows(rows: Rows) -> Self {
        Self {
            result: Execution::Rows(rows.rows),
            fields: Some(rows.columns),
        }
    }

    /// Wrap the run info of a writer statement.
    pub fn info(info: RunInfo) -> Self {
        Self {
            result: Execution::Info(info),
            fields: None,
        }
    }

    /// The returned rows, if the statement was a reader.
    pub fn as_rows(&self) -> Option<&[Row]> {
        match &self.result {
            Execution::Rows(rows) => Some(rows),
            Execution::Info(_) => None,
        }
    }

    /// The run info, if the statement was a writer.
    pub fn as_info(&self) -> Option<RunInfo> {
        match self.result {
            Execution::Info(info) => Some(info),
            Execution::Rows(_) => None,
        }
    }
}

/// Deserialize a row into any `serde` type.
pub fn from_row<T: DeserializeOwned>(row: Row) -> QueryResult<T> {
    serde_json::from_value(JsonValue::Object(row))
        .map_err(|e| QueryError::deserialization(e.to_string()).with_source(e))
}
