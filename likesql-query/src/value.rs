//! Bind parameters and the data maps passed to `insert` and `update`.

use indexmap::IndexMap;

use crate::raw::Sql;

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Boolean value, stored as 0/1 by engines without a boolean type.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary value.
    Blob(Vec<u8>),
    /// JSON value, stored as its serialized text.
    Json(serde_json::Value),
}

impl Value {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Blob(v.to_vec())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

/// Column values for an `INSERT`, in column order.
pub type Record = IndexMap<String, Value>;

/// The right-hand side of a `SET column = ...` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Assign {
    /// Bind a plain value.
    Value(Value),
    /// Use a SQL expression with its own `?` parameters, e.g. `count + ?`.
    Expr(Sql),
}

impl Assign {
    /// Build an expression assignment from SQL text and its arguments.
    pub fn expr(sql: impl Into<String>, args: impl IntoIterator<Item = Value>) -> Self {
        Self::Expr(Sql::with_params(sql, args))
    }
}

macro_rules! assign_from {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Assign {
                fn from(v: $ty) -> Self {
                    Self::Value(v.into())
                }
            }
        )+
    };
}

assign_from!(
    Value,
    bool,
    i32,
    u32,
    i64,
    f32,
    f64,
    String,
    &String,
    &str,
    Vec<u8>,
    &[u8],
    serde_json::Value,
);

impl<T: Into<Value>> From<Option<T>> for Assign {
    fn from(v: Option<T>) -> Self {
        Self::Value(v.into())
    }
}

/// Column assignments for an `UPDATE`, in column order.
pub type Changes = IndexMap<String, Assign>;

/// Build a [`Record`] or [`Changes`] map from `column => value` pairs.
///
/// ```rust
/// use likesql_query::{record, Record, Value};
///
/// let row: Record = record! { "name" => "Alice", "age" => 30 };
/// assert_eq!(row["age"], Value::Int(30));
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::IndexMap::new()
    };
    ($($column:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::IndexMap::new();
        $(
            map.insert(::std::string::String::from($column), ::std::convert::Into::into($value));
        )+
        map
    }};
}
