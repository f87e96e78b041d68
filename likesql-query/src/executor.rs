//! The seam between the statement templates and an engine adapter.
//!
//! An adapter implements [`Executor`]: it knows how to run a [`Sql`] and how
//! to shape the engine's answer into [`RunInfo`], [`Rows`] or [`Output`].
//! Every executor gets the CRUD surface of [`LikeSql`] for free.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::builder::QueryBuilder;
use crate::dialect::Dialect;
use crate::error::{QueryError, QueryResult};
use crate::find::Find;
use crate::raw::Sql;
use crate::row::{Output, Row, Rows, RunInfo, from_row};
use crate::schema::{Columns, TableOptions};
use crate::value::{Changes, Record, Value};

/// Engine hooks an adapter provides.
#[async_trait]
pub trait Executor: Send + Sync {
    /// SQL dialect of the engine.
    type Dialect: Dialect;

    /// Statement templates for this engine.
    fn builder(&self) -> &QueryBuilder<Self::Dialect>;

    /// Run a statement that produces no rows.
    async fn run(&self, sql: Sql) -> QueryResult<RunInfo>;

    /// Run a statement and collect its rows and columns.
    async fn fetch(&self, sql: Sql) -> QueryResult<Rows>;

    /// Run arbitrary SQL. Readers return rows and fields, writers run info.
    async fn execute(&self, sql: &str, params: Vec<Value>) -> QueryResult<Output>;
}

/// The CRUD surface shared by every adapter.
#[async_trait]
pub trait LikeSql: Executor {
    /// Create a database. Fails up front on single-file engines.
    async fn create_database(&self, name: &str, if_not_exists: bool) -> QueryResult<()> {
        let sql = self.builder().create_database(name, if_not_exists)?;
        self.run(sql).await.map(|_| ())
    }

    /// Drop a database. Fails up front on single-file engines.
    async fn drop_database(&self, name: &str, if_exists: bool) -> QueryResult<()> {
        let sql = self.builder().drop_database(name, if_exists)?;
        self.run(sql).await.map(|_| ())
    }

    /// Create a table.
    async fn create_table(
        &self,
        table: &str,
        columns: &Columns,
        options: TableOptions,
    ) -> QueryResult<()> {
        let sql = self.builder().create_table(table, columns, options)?;
        debug!(table, "create_table");
        self.run(sql).await.map(|_| ())
    }

    /// Drop a table.
    async fn drop_table(&self, table: &str, if_exists: bool) -> QueryResult<()> {
        let sql = self.builder().drop_table(table, if_exists)?;
        debug!(table, "drop_table");
        self.run(sql).await.map(|_| ())
    }

    /// Insert a row and return the last inserted rowid.
    async fn insert(&self, table: &str, data: &Record) -> QueryResult<i64> {
        let sql = self.builder().insert(table, data)?;
        let info = self
            .run(sql)
            .await
            .map_err(|e| e.with_context("insert").with_table(table))?;
        Ok(info.last_insert_rowid)
    }

    /// Select matching rows.
    async fn select(&self, table: &str, columns: &[&str], find: &Find) -> QueryResult<Vec<Row>> {
        Ok(self.select_with_columns(table, columns, find).await?.rows)
    }

    /// Select matching rows together with the result columns.
    async fn select_with_columns(
        &self,
        table: &str,
        columns: &[&str],
        find: &Find,
    ) -> QueryResult<Rows> {
        let sql = self.builder().select(table, columns, find)?;
        self.fetch(sql).await
    }

    /// Select the first matching row.
    async fn select_one(
        &self,
        table: &str,
        columns: &[&str],
        find: &Find,
    ) -> QueryResult<Option<Row>> {
        let sql = self.builder().select_one(table, columns, find)?;
        Ok(self.fetch(sql).await?.rows.into_iter().next())
    }

    /// Select matching rows and deserialize them.
    async fn select_as<T>(&self, table: &str, columns: &[&str], find: &Find) -> QueryResult<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        let sql = self.builder().select(table, columns, find)?;
        self.fetch(sql).await?.deserialize()
    }

    /// Select the first matching row and deserialize it.
    async fn select_one_as<T>(
        &self,
        table: &str,
        columns: &[&str],
        find: &Find,
    ) -> QueryResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.select_one(table, columns, find)
            .await?
            .map(from_row)
            .transpose()
    }

    /// Whether any row matches.
    async fn exists(&self, table: &str, find: &Find) -> QueryResult<bool> {
        let sql = self.builder().exists(table, find)?;
        let rows = self.fetch(sql).await?;
        Ok(match rows.scalar() {
            Some(JsonValue::Bool(b)) => *b,
            Some(JsonValue::Number(n)) => n.as_i64().unwrap_or(0) != 0,
            _ => false,
        })
    }

    /// Number of matching rows.
    async fn count(&self, table: &str, find: &Find) -> QueryResult<i64> {
        let sql = self.builder().count(table, find)?;
        let rows = self.fetch(sql).await?;
        rows.scalar()
            .and_then(JsonValue::as_i64)
            .ok_or_else(|| QueryError::internal(format!("COUNT on {} returned no number", table)))
    }

    /// Update matching rows and return how many changed.
    async fn update(&self, table: &str, data: &Changes, find: &Find) -> QueryResult<u64> {
        let sql = self.builder().update(table, data, find)?;
        let info = self
            .run(sql)
            .await
            .map_err(|e| e.with_context("update").with_table(table))?;
        Ok(info.changes)
    }

    /// Delete matching rows and return how many were removed.
    async fn delete(&self, table: &str, find: &Find) -> QueryResult<u64> {
        let sql = self.builder().delete(table, find)?;
        Ok(self.run(sql).await?.changes)
    }

    /// Run a builder-produced statement as a raw pass-through.
    async fn query(&self, sql: Sql) -> QueryResult<Output> {
        let (text, params) = sql.build();
        self.execute(&text, params).await
    }
}

impl<E: Executor + ?Sized> LikeSql for E {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::SqliteDialect;
    use crate::error::ErrorCode;
    use crate::record;
    use crate::row::ColumnInfo;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every statement and answers with canned results.
    struct Recorder {
        builder: QueryBuilder<SqliteDialect>,
        seen: Mutex<Vec<(String, Vec<Value>)>>,
        rows: Rows,
        info: RunInfo,
    }

    impl Recorder {
        fn new(rows: Rows, info: RunInfo) -> Self {
            Self {
                builder: QueryBuilder::new(SqliteDialect),
                seen: Mutex::new(Vec::new()),
                rows,
                info,
            }
        }

        fn last_sql(&self) -> String {
            self.seen.lock().unwrap().last().map(|(s, _)| s.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl Executor for Recorder {
        type Dialect = SqliteDialect;

        fn builder(&self) -> &QueryBuilder<SqliteDialect> {
            &self.builder
        }

        async fn run(&self, sql: Sql) -> QueryResult<RunInfo> {
            self.seen.lock().unwrap().push(sql.build());
            Ok(self.info)
        }

        async fn fetch(&self, sql: Sql) -> QueryResult<Rows> {
            self.seen.lock().unwrap().push(sql.build());
            Ok(self.rows.clone())
        }

        async fn execute(&self, sql: &str, params: Vec<Value>) -> QueryResult<Output> {
            self.seen.lock().unwrap().push((sql.to_string(), params));
            Ok(Output::info(self.info))
        }
    }

    fn scalar(name: &str, value: JsonValue) -> Rows {
        let mut row = Row::new();
        row.insert(name.to_string(), value);
        Rows {
            rows: vec![row],
            columns: vec![ColumnInfo::new(name, None)],
        }
    }

    #[tokio::test]
    async fn test_insert_returns_rowid() {
        let db = Recorder::new(Rows::default(), RunInfo { changes: 1, last_insert_rowid: 42 });
        let id = db.insert("users", &record! { "name" => "Ann" }).await.unwrap();
        assert_eq!(id, 42);
        assert_eq!(db.last_sql(), r#"INSERT INTO "users" ("name") VALUES (?)"#);
    }

    #[tokio::test]
    async fn test_update_and_delete_return_changes() {
        let db = Recorder::new(Rows::default(), RunInfo { changes: 3, last_insert_rowid: 0 });
        let changes: Changes = record! { "name" => "Bob" };
        assert_eq!(db.update("users", &changes, &Find::all()).await.unwrap(), 3);
        assert_eq!(db.delete("users", &Find::new("id > ?").arg(1)).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_exists_and_count_read_first_column() {
        let db = Recorder::new(scalar("exists", json!(1)), RunInfo::default());
        assert!(db.exists("users", &Find::all()).await.unwrap());

        let db = Recorder::new(scalar("exists", json!(0)), RunInfo::default());
        assert!(!db.exists("users", &Find::all()).await.unwrap());

        let db = Recorder::new(scalar("count", json!(7)), RunInfo::default());
        assert_eq!(db.count("users", &Find::all()).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_select_one_and_as() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Name {
            name: String,
        }

        let db = Recorder::new(scalar("name", json!("Ann")), RunInfo::default());
        let row = db.select_one("users", &["name"], &Find::all()).await.unwrap();
        assert_eq!(row.and_then(|r| r.get("name").cloned()), Some(json!("Ann")));
        assert!(db.last_sql().ends_with("LIMIT 1"));

        let names: Vec<Name> = db.select_as("users", &["name"], &Find::all()).await.unwrap();
        assert_eq!(names, vec![Name { name: "Ann".to_string() }]);
    }

    #[tokio::test]
    async fn test_create_database_fails_before_running() {
        let db = Recorder::new(Rows::default(), RunInfo::default());
        let err = db.create_database("other", true).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unsupported);
        assert!(db.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_passes_builder_sql_through() {
        let db = Recorder::new(Rows::default(), RunInfo { changes: 1, last_insert_rowid: 5 });
        let out = db.query(Sql::new("DELETE FROM t WHERE id = ").bind(5)).await.unwrap();
        assert_eq!(out.as_info().map(|i| i.changes), Some(1));
        let seen = db.seen.lock().unwrap();
        assert_eq!(seen[0], ("DELETE FROM t WHERE id = ?".to_string(), vec![Value::Int(5)]));
    }
}
