//! Per-engine SQL differences used by the statement templates.

use crate::schema::{ColumnType, DefaultValue};

/// Engine-specific pieces of SQL syntax.
///
/// The statement templates in [`QueryBuilder`](crate::builder::QueryBuilder)
/// are written once; a dialect supplies quoting, type names and capability
/// flags.
pub trait Dialect: Send + Sync {
    /// Name of the engine, used in error messages.
    fn name(&self) -> &'static str;

    /// Quote an identifier (table or column name).
    fn quote_ident(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    /// Quote a string literal.
    fn quote_literal(&self, text: &str) -> String {
        format!("'{}'", text.replace('\'', "''"))
    }

    /// Concrete SQL type for a logical column type.
    fn column_type(&self, ty: &ColumnType) -> String;

    /// Keyword appended to an auto-incrementing primary key column.
    fn autoincrement(&self) -> &'static str;

    /// Render a column default.
    fn default_value(&self, value: &DefaultValue) -> String {
        match value {
            DefaultValue::Null => "NULL".to_string(),
            DefaultValue::Integer(i) => i.to_string(),
            DefaultValue::Real(f) if f.is_finite() => f.to_string(),
            DefaultValue::Real(_) => "NULL".to_string(),
            DefaultValue::Text(s) => self.quote_literal(s),
            DefaultValue::CurrentTimestamp => "CURRENT_TIMESTAMP".to_string(),
            DefaultValue::Expr(expr) => format!("({})", expr),
        }
    }

    /// Whether `CREATE DATABASE` / `DROP DATABASE` exist.
    fn supports_databases(&self) -> bool {
        true
    }

    /// Whether tables can opt out of the implicit rowid.
    fn supports_without_rowid(&self) -> bool {
        false
    }
}

/// SQLite syntax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    fn column_type(&self, ty: &ColumnType) -> String {
        match ty {
            ColumnType::Integer | ColumnType::Boolean => "INTEGER".to_string(),
            ColumnType::Real => "REAL".to_string(),
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::Blob => "BLOB".to_string(),
            ColumnType::Numeric => "NUMERIC".to_string(),
            ColumnType::Custom(name) => name.clone(),
        }
    }

    fn autoincrement(&self) -> &'static str {
        "AUTOINCREMENT"
    }

    fn supports_databases(&self) -> bool {
        false
    }

    fn supports_without_rowid(&self) -> bool {
        true
    }
}
