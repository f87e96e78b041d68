//! Row selection shared by `select`, `exists`, `count`, `update` and `delete`.

use crate::raw::Sql;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// SQL keyword.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A `WHERE` fragment with `?` placeholders, its arguments, and the
/// ordering and paging suffixes.
///
/// ```rust
/// use likesql_query::Find;
///
/// let find = Find::new("age > ? AND name LIKE ?")
///     .arg(18)
///     .arg("A%")
///     .desc("age")
///     .limit(10);
/// assert_eq!(find.params().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Find {
    clause: Sql,
    order_by: Vec<(String, SortOrder)>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Find {
    /// Match every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match rows by a `WHERE` fragment containing `?` placeholders.
    pub fn new(clause: impl Into<String>) -> Self {
        Self {
            clause: Sql::new(clause),
            ..Self::default()
        }
    }

    /// Bind the next `?` of the fragment.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.clause = self.clause.append(Sql::with_params("", [value.into()]));
        self
    }

    /// Bind several `?` of the fragment in order.
    pub fn args(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.clause = self.clause.append(Sql::with_params("", values));
        self
    }

    /// Add an `ORDER BY` term.
    pub fn order_by(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.order_by.push((column.into(), order));
        self
    }

    /// Add an ascending `ORDER BY` term.
    pub fn asc(self, column: impl Into<String>) -> Self {
        self.order_by(column, SortOrder::Asc)
    }

    /// Add a descending `ORDER BY` term.
    pub fn desc(self, column: impl Into<String>) -> Self {
        self.order_by(column, SortOrder::Desc)
    }

    /// Limit the number of rows.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip rows.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// The `WHERE` fragment, `None` when every row matches.
    pub fn clause(&self) -> Option<&Sql> {
        (!self.clause.is_empty()).then_some(&self.clause)
    }

    /// Arguments bound to the fragment.
    pub fn params(&self) -> &[Value] {
        self.clause.params()
    }

    /// `ORDER BY` terms.
    pub fn ordering(&self) -> &[(String, SortOrder)] {
        &self.order_by
    }

    /// Row limit.
    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    /// Row offset.
    pub fn offset_value(&self) -> Option<u64> {
        self.offset
    }
}

impl From<&str> for Find {
    fn from(clause: &str) -> Self {
        Self::new(clause)
    }
}

impl From<String> for Find {
    fn from(clause: String) -> Self {
        Self::new(clause)
    }
}

impl From<Sql> for Find {
    fn from(clause: Sql) -> Self {
        Self {
            clause,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_has_no_clause() {
        assert!(Find::all().clause().is_none());
        assert!(Find::new("").clause().is_none());
    }

    #[test]
    fn test_args_in_order() {
        let find = Find::new("a = ? AND b = ?").arg(1).args([Value::from("x")]);
        assert_eq!(find.clause().map(Sql::sql), Some("a = ? AND b = ?"));
        assert_eq!(find.params(), &[Value::Int(1), Value::from("x")]);
    }

    #[test]
    fn test_from_sql() {
        let find = Find::from(Sql::new("id = ").bind(7));
        assert_eq!(find.clause().map(Sql::sql), Some("id = ?"));
        assert_eq!(find.params(), &[Value::Int(7)]);
    }

    #[test]
    fn test_ordering_and_paging() {
        let find = Find::all().asc("name").desc("id").limit(5).offset(10);
        assert_eq!(
            find.ordering(),
            &[
                ("name".to_string(), SortOrder::Asc),
                ("id".to_string(), SortOrder::Desc)
            ]
        );
        assert_eq!(find.limit_value(), Some(5));
        assert_eq!(find.offset_value(), Some(10));
    }
}
