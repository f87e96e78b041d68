//! Statement templates for the CRUD operations.
//!
//! [`QueryBuilder`] turns high-level calls into [`Sql`] (text plus positional
//! parameters). It never touches a database; adapters execute what it
//! produces.
//!
//! ```rust
//! use likesql_query::{Find, QueryBuilder, SqliteDialect, record};
//!
//! let builder = QueryBuilder::new(SqliteDialect);
//!
//! let sql = builder.insert("users", &record! { "name" => "Ann", "age" => 30 }).unwrap();
//! assert_eq!(sql.sql(), r#"INSERT INTO "users" ("name", "age") VALUES (?, ?)"#);
//!
//! let sql = builder.select("users", &["name"], &Find::new("age > ?").arg(18)).unwrap();
//! assert_eq!(sql.sql(), r#"SELECT "name" FROM "users" WHERE age > ?"#);
//! ```

use tracing::trace;

use crate::dialect::Dialect;
use crate::error::{QueryError, QueryResult};
use crate::find::Find;
use crate::raw::Sql;
use crate::schema::{Columns, TableOptions};
use crate::value::{Assign, Changes, Record};

/// Builds SQL statements for a dialect.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder<D> {
    dialect: D,
}

impl<D: Dialect> QueryBuilder<D> {
    /// Create a builder for the given dialect.
    pub fn new(dialect: D) -> Self {
        Self { dialect }
    }

    /// The dialect in use.
    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    /// `CREATE DATABASE`.
    pub fn create_database(&self, name: &str, if_not_exists: bool) -> QueryResult<Sql> {
        if !self.dialect.supports_databases() {
            return Err(QueryError::unsupported("CREATE DATABASE", self.dialect.name()));
        }
        let name = self.ident("database", name)?;
        Ok(Sql::new("CREATE DATABASE ")
            .push_if(if_not_exists, "IF NOT EXISTS ")
            .push(name))
    }

    /// `DROP DATABASE`.
    pub fn drop_database(&self, name: &str, if_exists: bool) -> QueryResult<Sql> {
        if !self.dialect.supports_databases() {
            return Err(QueryError::unsupported("DROP DATABASE", self.dialect.name()));
        }
        let name = self.ident("database", name)?;
        Ok(Sql::new("DROP DATABASE ")
            .push_if(if_exists, "IF EXISTS ")
            .push(name))
    }

    /// `CREATE TABLE`.
    ///
    /// A single primary key column is declared inline (so an integer key
    /// aliases the rowid); several form a table-level `PRIMARY KEY`.
    pub fn create_table(
        &self,
        table: &str,
        columns: &Columns,
        options: TableOptions,
    ) -> QueryResult<Sql> {
        let table_name = self.ident("table", table)?;
        if columns.is_empty() {
            return Err(QueryError::invalid_input("columns", "at least one column is required"));
        }
        if options.without_rowid && !self.dialect.supports_without_rowid() {
            return Err(QueryError::unsupported("WITHOUT ROWID", self.dialect.name()));
        }

        let primary: Vec<&String> = columns
            .iter()
            .filter(|(_, def)| def.primary)
            .map(|(name, _)| name)
            .collect();
        let inline_primary = primary.len() == 1;

        let mut definitions = Vec::with_capacity(columns.len() + 1);
        for (name, def) in columns {
            if def.increment && !inline_primary {
                return Err(QueryError::invalid_input(
                    name.as_str(),
                    "an auto-increment column must be the only primary key",
                ));
            }

            let mut column = format!(
                "{} {}",
                self.ident("column", name)?,
                self.dialect.column_type(&def.ty)
            );
            if def.primary && inline_primary {
                column.push_str(" PRIMARY KEY");
                if def.increment {
                    column.push(' ');
                    column.push_str(self.dialect.autoincrement());
                }
            }
            if def.not_null {
                column.push_str(" NOT NULL");
            }
            if def.unique {
                column.push_str(" UNIQUE");
            }
            if let Some(ref default) = def.default {
                column.push_str(" DEFAULT ");
                column.push_str(&self.dialect.default_value(default));
            }
            definitions.push(column);
        }

        if primary.len() > 1 {
            let keys = primary
                .iter()
                .map(|name| self.dialect.quote_ident(name))
                .collect::<Vec<_>>()
                .join(", ");
            definitions.push(format!("PRIMARY KEY ({})", keys));
        }

        let sql = Sql::new("CREATE TABLE ")
            .push_if(options.if_not_exists, "IF NOT EXISTS ")
            .push(format!("{} ({})", table_name, definitions.join(", ")))
            .push_if(options.without_rowid, " WITHOUT ROWID");
        trace!(sql = %sql, "create_table");
        Ok(sql)
    }

    /// `DROP TABLE`.
    pub fn drop_table(&self, table: &str, if_exists: bool) -> QueryResult<Sql> {
        let table = self.ident("table", table)?;
        Ok(Sql::new("DROP TABLE ").push_if(if_exists, "IF EXISTS ").push(table))
    }

    /// `INSERT INTO table (...) VALUES (...)`.
    pub fn insert(&self, table: &str, data: &Record) -> QueryResult<Sql> {
        let table = self.ident("table", table)?;
        if data.is_empty() {
            return Err(QueryError::invalid_input("data", "insert requires at least one column"));
        }

        let columns = data
            .keys()
            .map(|c| self.ident("column", c))
            .collect::<QueryResult<Vec<_>>>()?
            .join(", ");

        Ok(Sql::new(format!("INSERT INTO {} ({}) VALUES (", table, columns))
            .bind_many(data.values().cloned())
            .push(")"))
    }

    /// `SELECT columns FROM table [WHERE ...] [ORDER BY ...] [LIMIT ...]`.
    ///
    /// An empty column list selects `*`.
    pub fn select(&self, table: &str, columns: &[&str], find: &Find) -> QueryResult<Sql> {
        let table = self.ident("table", table)?;
        let columns = if columns.is_empty() {
            "*".to_string()
        } else {
            columns
                .iter()
                .map(|c| self.column_ref(c))
                .collect::<QueryResult<Vec<_>>>()?
                .join(", ")
        };

        let sql = Sql::new(format!("SELECT {} FROM {}", columns, table));
        let sql = self.push_where(sql, find)?;
        Ok(self.push_paging(sql, find, find.limit_value()))
    }

    /// Like [`select`](Self::select), limited to one row.
    pub fn select_one(&self, table: &str, columns: &[&str], find: &Find) -> QueryResult<Sql> {
        self.select(table, columns, &find.clone().limit(1))
    }

    /// `SELECT EXISTS(SELECT 1 FROM table WHERE ... LIMIT 1)`.
    pub fn exists(&self, table: &str, find: &Find) -> QueryResult<Sql> {
        let table = self.ident("table", table)?;
        let sql = Sql::new(format!("SELECT EXISTS(SELECT 1 FROM {}", table));
        let sql = self.push_where(sql, find)?;
        Ok(sql.push(format!(" LIMIT 1) AS {}", self.dialect.quote_ident("exists"))))
    }

    /// `SELECT COUNT(1) FROM table WHERE ...`.
    pub fn count(&self, table: &str, find: &Find) -> QueryResult<Sql> {
        let table = self.ident("table", table)?;
        let sql = Sql::new(format!(
            "SELECT COUNT(1) AS {} FROM {}",
            self.dialect.quote_ident("count"),
            table
        ));
        self.push_where(sql, find)
    }

    /// `UPDATE table SET ... WHERE ...`.
    pub fn update(&self, table: &str, data: &Changes, find: &Find) -> QueryResult<Sql> {
        let table = self.ident("table", table)?;
        if data.is_empty() {
            return Err(QueryError::invalid_input("data", "update requires at least one column"));
        }
        self.reject_paging("UPDATE", find)?;

        let mut sql = Sql::new(format!("UPDATE {} SET ", table));
        for (i, (column, assign)) in data.iter().enumerate() {
            if i > 0 {
                sql = sql.push(", ");
            }
            sql = sql.push(format!("{} = ", self.ident("column", column)?));
            sql = match assign {
                Assign::Value(value) => sql.bind(value.clone()),
                Assign::Expr(expr) => sql.append(expr.clone()),
            };
        }

        self.push_where(sql, find)
    }

    /// `DELETE FROM table WHERE ...`.
    pub fn delete(&self, table: &str, find: &Find) -> QueryResult<Sql> {
        let table = self.ident("table", table)?;
        self.reject_paging("DELETE", find)?;
        self.push_where(Sql::new(format!("DELETE FROM {}", table)), find)
    }

    fn ident(&self, what: &str, name: &str) -> QueryResult<String> {
        if name.trim().is_empty() {
            return Err(QueryError::invalid_input(what, "name must not be empty"));
        }
        Ok(self.dialect.quote_ident(name))
    }

    /// Column names are quoted, spaces included. `*`, qualified names and
    /// expressions (anything with an operator, a call or an `AS` alias) pass
    /// through as written.
    fn column_ref(&self, column: &str) -> QueryResult<String> {
        if column.trim().is_empty() {
            return Err(QueryError::invalid_input("column", "name must not be empty"));
        }
        let expression = column.contains(|c: char| "*().,+-/|<>=!%'\"".contains(c))
            || column.to_ascii_lowercase().contains(" as ");
        if expression {
            Ok(column.to_string())
        } else {
            self.ident("column", column)
        }
    }

    fn push_where(&self, sql: Sql, find: &Find) -> QueryResult<Sql> {
        match find.clause() {
            Some(clause) => Ok(sql.push(" WHERE ").append(clause.clone())),
            None if !find.params().is_empty() => Err(QueryError::invalid_input(
                "find",
                "arguments are bound but the condition is empty",
            )),
            None => Ok(sql),
        }
    }

    fn push_paging(&self, mut sql: Sql, find: &Find, limit: Option<u64>) -> Sql {
        if !find.ordering().is_empty() {
            let terms = find
                .ordering()
                .iter()
                .map(|(column, order)| {
                    format!("{} {}", self.dialect.quote_ident(column), order.as_sql())
                })
                .collect::<Vec<_>>()
                .join(", ");
            sql = sql.push(" ORDER BY ").push(terms);
        }

        match (limit, find.offset_value()) {
            (Some(limit), Some(offset)) => sql.push(format!(" LIMIT {} OFFSET {}", limit, offset)),
            (Some(limit), None) => sql.push(format!(" LIMIT {}", limit)),
            (None, Some(offset)) => sql.push(format!(" LIMIT -1 OFFSET {}", offset)),
            (None, None) => sql,
        }
    }

    fn reject_paging(&self, statement: &str, find: &Find) -> QueryResult<()> {
        if !find.ordering().is_empty()
            || find.limit_value().is_some()
            || find.offset_value().is_some()
        {
            return Err(QueryError::invalid_input(
                "find",
                format!("{} does not accept ORDER BY, LIMIT or OFFSET", statement),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::SqliteDialect;
    use crate::error::ErrorCode;
    use crate::schema::{ColumnDef, DefaultValue};
    use crate::value::Value;
    use crate::record;
    use pretty_assertions::assert_eq;

    fn builder() -> QueryBuilder<SqliteDialect> {
        QueryBuilder::new(SqliteDialect)
    }

    #[test]
    fn test_insert() {
        let sql = builder()
            .insert("ips", &record! { "addr" => "127.0.0.1", "hits" => 1 })
            .unwrap();
        let (text, params) = sql.build();
        assert_eq!(text, r#"INSERT INTO "ips" ("addr", "hits") VALUES (?, ?)"#);
        assert_eq!(params, vec![Value::from("127.0.0.1"), Value::Int(1)]);
    }

    #[test]
    fn test_insert_requires_data() {
        let err = builder().insert("ips", &Record::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParameter);
    }

    #[test]
    fn test_empty_table_name() {
        let err = builder().select(" ", &[], &Find::all()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParameter);
    }

    #[test]
    fn test_select_all() {
        let sql = builder().select("ips", &[], &Find::all()).unwrap();
        assert_eq!(sql.sql(), r#"SELECT * FROM "ips""#);
        assert!(sql.params().is_empty());
    }

    #[test]
    fn test_select_with_find_order_and_paging() {
        let find = Find::new("hits > ?").arg(2).desc("hits").asc("addr").limit(10).offset(20);
        let sql = builder().select("ips", &["addr", "hits"], &find).unwrap();
        assert_eq!(
            sql.sql(),
            r#"SELECT "addr", "hits" FROM "ips" WHERE hits > ? ORDER BY "hits" DESC, "addr" ASC LIMIT 10 OFFSET 20"#
        );
        assert_eq!(sql.params(), &[Value::Int(2)]);
    }

    #[test]
    fn test_select_offset_without_limit() {
        let sql = builder().select("ips", &[], &Find::all().offset(5)).unwrap();
        assert_eq!(sql.sql(), r#"SELECT * FROM "ips" LIMIT -1 OFFSET 5"#);
    }

    #[test]
    fn test_select_expression_columns_pass_through() {
        let sql = builder()
            .select("ips", &["*", "hits * 2 AS double"], &Find::all())
            .unwrap();
        assert_eq!(sql.sql(), r#"SELECT *, hits * 2 AS double FROM "ips""#);
    }

    #[test]
    fn test_select_names_with_spaces_are_quoted() {
        let sql = builder()
            .select("people", &["first name", "t.age", "count(*)"], &Find::all())
            .unwrap();
        assert_eq!(sql.sql(), r#"SELECT "first name", t.age, count(*) FROM "people""#);
    }

    #[test]
    fn test_select_one_overrides_limit() {
        let find = Find::new("addr = ?").arg("::1").limit(50);
        let sql = builder().select_one("ips", &[], &find).unwrap();
        assert_eq!(sql.sql(), r#"SELECT * FROM "ips" WHERE addr = ? LIMIT 1"#);
    }

    #[test]
    fn test_exists() {
        let sql = builder().exists("ips", &Find::new("addr = ?").arg("::1")).unwrap();
        assert_eq!(
            sql.sql(),
            r#"SELECT EXISTS(SELECT 1 FROM "ips" WHERE addr = ? LIMIT 1) AS "exists""#
        );
        assert_eq!(sql.param_count(), 1);
    }

    #[test]
    fn test_count() {
        let sql = builder().count("ips", &Find::all()).unwrap();
        assert_eq!(sql.sql(), r#"SELECT COUNT(1) AS "count" FROM "ips""#);
    }

    #[test]
    fn test_update_with_expression() {
        let changes: Changes = record! {
            "addr" => "10.0.0.1",
            "hits" => Assign::expr("hits + ?", [Value::Int(1)]),
        };
        let sql = builder()
            .update("ips", &changes, &Find::new("addr = ?").arg("::1"))
            .unwrap();
        let (text, params) = sql.build();
        assert_eq!(
            text,
            r#"UPDATE "ips" SET "addr" = ?, "hits" = hits + ? WHERE addr = ?"#
        );
        assert_eq!(
            params,
            vec![Value::from("10.0.0.1"), Value::Int(1), Value::from("::1")]
        );
    }

    #[test]
    fn test_update_rejects_limit() {
        let changes: Changes = record! { "hits" => 0 };
        let err = builder()
            .update("ips", &changes, &Find::all().limit(1))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParameter);
    }

    #[test]
    fn test_delete() {
        let sql = builder().delete("ips", &Find::new("hits < ?").arg(5)).unwrap();
        assert_eq!(sql.sql(), r#"DELETE FROM "ips" WHERE hits < ?"#);

        let sql = builder().delete("ips", &Find::all()).unwrap();
        assert_eq!(sql.sql(), r#"DELETE FROM "ips""#);
    }

    #[test]
    fn test_empty_condition_with_arguments_is_rejected() {
        let find = Find::new("").arg(99);
        let changes: Changes = record! { "hits" => 0 };
        for result in [
            builder().delete("ips", &find),
            builder().update("ips", &changes, &find),
            builder().select("ips", &[], &find),
            builder().count("ips", &find),
            builder().exists("ips", &find),
        ] {
            assert_eq!(result.unwrap_err().code, ErrorCode::InvalidParameter);
        }
    }

    #[test]
    fn test_databases_unsupported() {
        let err = builder().create_database("other", true).unwrap_err();
        assert!(err.is_unsupported());
        let err = builder().drop_database("other", true).unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_create_table() {
        let columns: Columns = [
            ("id".to_string(), ColumnDef::integer().increment()),
            ("email".to_string(), ColumnDef::text().not_null().unique()),
            (
                "hits".to_string(),
                ColumnDef::integer().not_null().default(DefaultValue::Integer(0)),
            ),
        ]
        .into_iter()
        .collect();

        let sql = builder()
            .create_table("users", &columns, TableOptions::new().if_not_exists())
            .unwrap();
        assert_eq!(
            sql.sql(),
            r#"CREATE TABLE IF NOT EXISTS "users" ("id" INTEGER PRIMARY KEY AUTOINCREMENT, "email" TEXT NOT NULL UNIQUE, "hits" INTEGER NOT NULL DEFAULT 0)"#
        );
    }

    #[test]
    fn test_create_table_without_rowid_composite_key() {
        let columns: Columns = [
            ("a".to_string(), ColumnDef::text().primary()),
            ("b".to_string(), ColumnDef::integer().primary()),
            ("v".to_string(), ColumnDef::blob()),
        ]
        .into_iter()
        .collect();

        let sql = builder()
            .create_table("pairs", &columns, TableOptions::new().without_rowid())
            .unwrap();
        assert_eq!(
            sql.sql(),
            r#"CREATE TABLE "pairs" ("a" TEXT, "b" INTEGER, "v" BLOB, PRIMARY KEY ("a", "b")) WITHOUT ROWID"#
        );
    }

    #[test]
    fn test_create_table_increment_needs_single_key() {
        let columns: Columns = [
            ("a".to_string(), ColumnDef::integer().increment()),
            ("b".to_string(), ColumnDef::integer().primary()),
        ]
        .into_iter()
        .collect();

        let err = builder()
            .create_table("bad", &columns, TableOptions::new())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParameter);
    }

    #[test]
    fn test_drop_table() {
        assert_eq!(
            builder().drop_table("ips", true).unwrap().sql(),
            r#"DROP TABLE IF EXISTS "ips""#
        );
        assert_eq!(builder().drop_table("ips", false).unwrap().sql(), r#"DROP TABLE "ips""#);
    }
}
