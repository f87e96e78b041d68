//! Type conversion between likesql values and SQLite.

use likesql_query::Value;
use rusqlite::types::{Value as SqliteValue, ValueRef};
use serde_json::Value as JsonValue;

/// Convert a bind parameter to a SQLite value.
pub fn to_sqlite_value(value: Value) -> SqliteValue {
    match value {
        Value::Null => SqliteValue::Null,
        Value::Bool(b) => SqliteValue::Integer(i64::from(b)),
        Value::Int(i) => SqliteValue::Integer(i),
        Value::Float(f) => SqliteValue::Real(f),
        Value::Text(s) => SqliteValue::Text(s),
        Value::Blob(b) => SqliteValue::Blob(b),
        Value::Json(j) => SqliteValue::Text(j.to_string()),
    }
}

/// Convert a list of bind parameters.
pub fn to_sqlite_params(params: Vec<Value>) -> Vec<SqliteValue> {
    params.into_iter().map(to_sqlite_value).collect()
}

/// Convert a SQLite ValueRef to a JSON Value.
///
/// Blobs become arrays of byte values; non-finite reals become `null`.
pub fn from_sqlite_value(value: ValueRef<'_>) -> JsonValue {
    match value {
        ValueRef::Null => JsonValue::Null,
        ValueRef::Integer(i) => JsonValue::Number(i.into()),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        ValueRef::Text(bytes) => JsonValue::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => {
            JsonValue::Array(bytes.iter().map(|b| JsonValue::from(*b)).collect())
        }
    }
}

/// Get a JSON value from a row at the given column index.
pub fn get_value_at_index(row: &rusqlite::Row<'_>, index: usize) -> rusqlite::Result<JsonValue> {
    row.get_ref(index).map(from_sqlite_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_to_sqlite_value_bool() {
        assert_eq!(to_sqlite_value(Value::Bool(true)), SqliteValue::Integer(1));
        assert_eq!(to_sqlite_value(Value::Bool(false)), SqliteValue::Integer(0));
    }

    #[test]
    fn test_to_sqlite_value_json_is_text() {
        assert_eq!(
            to_sqlite_value(Value::Json(json!({ "k": [1, 2] }))),
            SqliteValue::Text(r#"{"k":[1,2]}"#.to_string())
        );
    }

    #[test]
    fn test_to_sqlite_params_keeps_order() {
        let params = to_sqlite_params(vec![Value::from("a"), Value::Null, Value::Float(0.5)]);
        assert_eq!(
            params,
            vec![
                SqliteValue::Text("a".to_string()),
                SqliteValue::Null,
                SqliteValue::Real(0.5)
            ]
        );
    }

    #[test]
    fn test_from_sqlite_value_scalars() {
        assert_eq!(from_sqlite_value(ValueRef::Null), JsonValue::Null);
        assert_eq!(from_sqlite_value(ValueRef::Integer(42)), json!(42));
        assert_eq!(from_sqlite_value(ValueRef::Real(1.5)), json!(1.5));
        assert_eq!(from_sqlite_value(ValueRef::Text(b"hello")), json!("hello"));
    }

    #[test]
    fn test_from_sqlite_value_json_looking_text_stays_text() {
        assert_eq!(
            from_sqlite_value(ValueRef::Text(b"{\"key\": 1}")),
            json!("{\"key\": 1}")
        );
    }

    #[test]
    fn test_from_sqlite_value_non_finite_real() {
        assert_eq!(from_sqlite_value(ValueRef::Real(f64::NAN)), JsonValue::Null);
    }

    #[test]
    fn test_from_sqlite_value_blob() {
        assert_eq!(from_sqlite_value(ValueRef::Blob(&[0, 7, 255])), json!([0, 7, 255]));
    }
}
