//! SQLite connection wrapper.
//!
//! Every call is shipped to the `tokio-rusqlite` background thread that owns
//! the engine handle. The calling task yields once before dispatching so a
//! busy caller cannot starve timers and I/O on the same runtime.

use likesql_query::{ColumnInfo, Output, Row, Rows, RunInfo};
use rusqlite::types::Value as SqliteValue;
use rusqlite::{Batch, Statement, params_from_iter};
use serde_json::Value as JsonValue;
use tokio_rusqlite::Connection;
use tracing::{debug, info, instrument};

use crate::config::{DatabasePath, SqliteConfig, VerboseHook};
use crate::error::{SqliteError, SqliteResult};
use crate::types::get_value_at_index;

/// A handle to the single engine connection.
///
/// Clones share the same background thread.
#[derive(Clone)]
pub struct SqliteConnection {
    conn: Connection,
    verbose: Option<VerboseHook>,
}

impl SqliteConnection {
    /// Open the database described by `config` and apply its pragmas.
    #[instrument(skip(config), fields(path = %config.path.display()))]
    pub async fn open(config: &SqliteConfig) -> SqliteResult<Self> {
        let flags = config.open_flags();
        let conn = match &config.path {
            DatabasePath::Memory => Connection::open_in_memory_with_flags(flags).await?,
            DatabasePath::File(path) => Connection::open_with_flags(path, flags).await?,
        };

        let init_sql = config.init_sql();
        let busy_timeout = config.busy_timeout_duration();
        conn.call(move |conn| {
            if let Some(timeout) = busy_timeout {
                conn.busy_timeout(timeout)?;
            }
            conn.execute_batch(&init_sql)?;
            Ok(())
        })
        .await?;

        info!(read_only = config.read_only, "SQLite database opened");
        Ok(Self {
            conn,
            verbose: config.verbose.clone(),
        })
    }

    /// Run a statement with its parameters and collect rows plus columns.
    #[instrument(skip(self, params), level = "debug")]
    pub async fn query(&self, sql: &str, params: Vec<SqliteValue>) -> SqliteResult<Rows> {
        self.dispatch(sql, move |conn, sql| {
            let mut stmt = prepare_single(conn, sql)?;
            collect_rows(&mut stmt, &params)
        })
        .await
    }

    /// Run a statement that returns no rows.
    #[instrument(skip(self, params), level = "debug")]
    pub async fn run(&self, sql: &str, params: Vec<SqliteValue>) -> SqliteResult<RunInfo> {
        self.dispatch(sql, move |conn, sql| {
            let mut stmt = prepare_single(conn, sql)?;
            let changes = stmt.execute(params_from_iter(params.iter()))?;
            Ok(RunInfo {
                changes: changes as u64,
                last_insert_rowid: conn.last_insert_rowid(),
            })
        })
        .await
    }

    /// Run any statement. Statements with result columns return rows and
    /// fields; all others return run info.
    #[instrument(skip(self, params), level = "debug")]
    pub async fn execute(&self, sql: &str, params: Vec<SqliteValue>) -> SqliteResult<Output> {
        self.dispatch(sql, move |conn, sql| {
            let mut stmt = prepare_single(conn, sql)?;
            if stmt.column_count() > 0 {
                return collect_rows(&mut stmt, &params).map(Output::rows);
            }
            let changes = stmt.execute(params_from_iter(params.iter()))?;
            Ok(Output::info(RunInfo {
                changes: changes as u64,
                last_insert_rowid: conn.last_insert_rowid(),
            }))
        })
        .await
    }

    /// Run an engine directive (`PRAGMA ...`) and return its rows.
    pub async fn pragma(&self, directive: &str) -> SqliteResult<Rows> {
        let sql = format!("PRAGMA {}", directive.trim().trim_end_matches(';'));
        self.query(&sql, Vec::new()).await
    }

    /// Shut the connection down. Clones fail with [`SqliteError::Closed`]
    /// afterwards.
    pub async fn close(self) -> SqliteResult<()> {
        self.conn.close().await?;
        info!("SQLite database closed");
        Ok(())
    }

    async fn dispatch<R, F>(&self, sql: &str, work: F) -> SqliteResult<R>
    where
        R: Send + 'static,
        F: FnOnce(&rusqlite::Connection, &str) -> rusqlite::Result<R> + Send + 'static,
    {
        if let Some(hook) = &self.verbose {
            hook.call(sql);
        }
        debug!(sql, "Executing statement");

        tokio::task::yield_now().await;

        let sql = sql.to_string();
        self.conn
            .call(move |conn| Ok(work(conn, &sql)?))
            .await
            .map_err(SqliteError::from)
    }
}

/// Prepare exactly one statement. Text after the first statement is an
/// error rather than being dropped.
fn prepare_single<'c>(
    conn: &'c rusqlite::Connection,
    sql: &str,
) -> rusqlite::Result<Statement<'c>> {
    let mut batch = Batch::new(conn, sql);
    let stmt = match batch.next()? {
        Some(stmt) => stmt,
        None => return conn.prepare(sql),
    };
    match batch.next() {
        Ok(None) => Ok(stmt),
        _ => Err(rusqlite::Error::MultipleStatement),
    }
}

fn column_info(stmt: &Statement<'_>) -> Vec<ColumnInfo> {
    stmt.columns()
        .iter()
        .map(|c| ColumnInfo::new(c.name(), c.decl_type().map(str::to_string)))
        .collect()
}

fn collect_rows(stmt: &mut Statement<'_>, params: &[SqliteValue]) -> rusqlite::Result<Rows> {
    let columns = column_info(stmt);
    let mut rows = stmt.query(params_from_iter(params.iter()))?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut map = Row::new();
        for (i, column) in columns.iter().enumerate() {
            map.insert(column.name.clone(), get_value_at_index(row, i)?);
        }
        out.push(map);
    }

    Ok(Rows { rows: out, columns })
}

/// First column of the first row.
pub(crate) fn first_value(rows: Rows) -> Option<JsonValue> {
    let name = rows.columns.into_iter().next()?.name;
    rows.rows.into_iter().next()?.remove(&name)
}
