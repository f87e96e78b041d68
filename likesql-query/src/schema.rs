//! Column and table definitions for `CREATE TABLE`.

use indexmap::IndexMap;

/// Logical column type, mapped to a concrete SQL type by the dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    /// Integer.
    Integer,
    /// Floating point.
    Real,
    /// Text.
    Text,
    /// Binary data.
    Blob,
    /// Boolean.
    Boolean,
    /// Numeric affinity.
    Numeric,
    /// Any type name, emitted verbatim.
    Custom(String),
}

/// Default value of a column.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// `DEFAULT NULL`.
    Null,
    /// Integer literal.
    Integer(i64),
    /// Float literal.
    Real(f64),
    /// Text literal, quoted by the dialect.
    Text(String),
    /// `DEFAULT CURRENT_TIMESTAMP`.
    CurrentTimestamp,
    /// Parenthesized SQL expression.
    Expr(String),
}

/// Definition of a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Column type.
    pub ty: ColumnType,
    /// Part of the primary key.
    pub primary: bool,
    /// Auto-incrementing primary key.
    pub increment: bool,
    /// `NOT NULL` constraint.
    pub not_null: bool,
    /// `UNIQUE` constraint.
    pub unique: bool,
    /// Default value.
    pub default: Option<DefaultValue>,
}

impl ColumnDef {
    /// Create a nullable column of the given type.
    pub fn new(ty: ColumnType) -> Self {
        Self {
            ty,
            primary: false,
            increment: false,
            not_null: false,
            unique: false,
            default: None,
        }
    }

    /// Shorthand for an `Integer` column.
    pub fn integer() -> Self {
        Self::new(ColumnType::Integer)
    }

    /// Shorthand for a `Text` column.
    pub fn text() -> Self {
        Self::new(ColumnType::Text)
    }

    /// Shorthand for a `Real` column.
    pub fn real() -> Self {
        Self::new(ColumnType::Real)
    }

    /// Shorthand for a `Blob` column.
    pub fn blob() -> Self {
        Self::new(ColumnType::Blob)
    }

    /// Mark the column as (part of) the primary key.
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// Mark the column as auto-incrementing. Implies primary key.
    pub fn increment(mut self) -> Self {
        self.increment = true;
        self.primary = true;
        self
    }

    /// Add a `NOT NULL` constraint.
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Add a `UNIQUE` constraint.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Set the default value.
    pub fn default(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }
}

/// Ordered column definitions of a table.
pub type Columns = IndexMap<String, ColumnDef>;

/// Options of a `CREATE TABLE` statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableOptions {
    /// Emit `IF NOT EXISTS`.
    pub if_not_exists: bool,
    /// Create the table without the implicit rowid.
    pub without_rowid: bool,
}

impl TableOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `IF NOT EXISTS`.
    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    /// Create the table without the implicit rowid.
    pub fn without_rowid(mut self) -> Self {
        self.without_rowid = true;
        self
    }
}
