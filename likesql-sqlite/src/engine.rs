//! The SQLite adapter.

use async_trait::async_trait;
use likesql_query::{
    Executor, Output, QueryBuilder, QueryError, QueryResult, Row, Rows, RunInfo, Sql,
    SqliteDialect, Value,
};
use parking_lot::Mutex;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::config::SqliteConfig;
use crate::connection::{SqliteConnection, first_value};
use crate::types::to_sqlite_params;

/// Embedded SQLite behind the [`LikeSql`](likesql_query::LikeSql) CRUD surface.
///
/// ```rust,no_run
/// use likesql_query::{Executor, Find, LikeSql, record};
/// use likesql_sqlite::{LikeSqlite, SqliteConfig};
///
/// # async fn demo() -> likesql_query::QueryResult<()> {
/// let db = LikeSqlite::open(SqliteConfig::file("app.db")).await?;
/// db.execute("CREATE TABLE IF NOT EXISTS ips (addr TEXT UNIQUE, hits INTEGER)", vec![]).await?;
///
/// let id = db.insert("ips", &record! { "addr" => "::1", "hits" => 1 }).await?;
/// let hot = db.select("ips", &[], &Find::new("hits > ?").arg(0)).await?;
/// assert_eq!(hot.len(), 1);
/// # let _ = id;
/// db.close().await
/// # }
/// ```
pub struct LikeSqlite {
    conn: Mutex<Option<SqliteConnection>>,
    config: SqliteConfig,
    builder: QueryBuilder<SqliteDialect>,
}

impl LikeSqlite {
    /// Open a database.
    pub async fn open(config: SqliteConfig) -> QueryResult<Self> {
        let conn = SqliteConnection::open(&config).await?;
        Ok(Self {
            conn: Mutex::new(Some(conn)),
            config,
            builder: QueryBuilder::new(SqliteDialect),
        })
    }

    /// Open a private in-memory database.
    pub async fn memory() -> QueryResult<Self> {
        Self::open(SqliteConfig::memory()).await
    }

    /// Open a database from a `sqlite:` URL.
    pub async fn from_url(url: impl AsRef<str>) -> QueryResult<Self> {
        Self::open(SqliteConfig::from_url(url)?).await
    }

    /// The configuration this adapter was opened with.
    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.conn.lock().is_none()
    }

    /// Run an engine directive, e.g. `pragma("table_info(users)")`.
    pub async fn pragma(&self, directive: &str) -> QueryResult<Vec<Row>> {
        let rows = self
            .connection()?
            .pragma(directive)
            .await
            .map_err(|e| QueryError::from(e).with_context("pragma"))?;
        Ok(rows.rows)
    }

    /// First column of the first row of an engine directive,
    /// e.g. `pragma_value("journal_mode")`.
    pub async fn pragma_value(&self, directive: &str) -> QueryResult<Option<JsonValue>> {
        let rows = self
            .connection()?
            .pragma(directive)
            .await
            .map_err(|e| QueryError::from(e).with_context("pragma"))?;
        Ok(first_value(rows))
    }

    /// Shut the connection down. Later calls fail with a connection-closed
    /// error; closing twice is a no-op.
    pub async fn close(&self) -> QueryResult<()> {
        let conn = self.conn.lock().take();
        match conn {
            Some(conn) => Ok(conn.close().await?),
            None => {
                debug!("close on an already closed adapter");
                Ok(())
            }
        }
    }

    fn connection(&self) -> QueryResult<SqliteConnection> {
        self.conn.lock().clone().ok_or_else(QueryError::closed)
    }
}

#[async_trait]
impl Executor for LikeSqlite {
    type Dialect = SqliteDialect;

    fn builder(&self) -> &QueryBuilder<SqliteDialect> {
        &self.builder
    }

    async fn run(&self, sql: Sql) -> QueryResult<RunInfo> {
        let (text, params) = sql.build();
        self.connection()?
            .run(&text, to_sqlite_params(params))
            .await
            .map_err(|e| QueryError::from(e).with_sql(text))
    }

    async fn fetch(&self, sql: Sql) -> QueryResult<Rows> {
        let (text, params) = sql.build();
        self.connection()?
            .query(&text, to_sqlite_params(params))
            .await
            .map_err(|e| QueryError::from(e).with_sql(text))
    }

    async fn execute(&self, sql: &str, params: Vec<Value>) -> QueryResult<Output> {
        self.connection()?
            .execute(sql, to_sqlite_params(params))
            .await
            .map_err(|e| QueryError::from(e).with_sql(sql))
    }
}
