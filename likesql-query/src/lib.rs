//! # likesql-query
//!
//! Engine-independent core of likesql.
//!
//! This crate provides:
//! - Parameter values and the `record!` macro for insert/update data
//! - Statement templates for create/drop, insert, select, exists, count,
//!   update and delete (`QueryBuilder`)
//! - The uniform result shapes (`Row`, `Rows`, `RunInfo`, `Output`)
//! - Stable error codes (`QueryError`, `ErrorCode`)
//! - The `Executor` seam an adapter implements, and the `LikeSql` CRUD
//!   surface every executor gets
//!
//! ## Finding rows
//!
//! ```rust
//! use likesql_query::{Find, Value};
//!
//! let find = Find::new("addr = ? AND hits > ?")
//!     .arg("127.0.0.1")
//!     .arg(10)
//!     .desc("hits")
//!     .limit(5);
//! assert_eq!(find.params(), &[Value::from("127.0.0.1"), Value::Int(10)]);
//! ```
//!
//! ## Raw SQL
//!
//! ```rust
//! use likesql_query::{raw_query, Sql};
//!
//! let sql = raw_query!("SELECT * FROM ips WHERE addr = {}", "::1");
//! assert_eq!(sql.sql(), "SELECT * FROM ips WHERE addr = ?");
//!
//! let sql = Sql::new("DELETE FROM ips WHERE hits < ").bind(3);
//! assert_eq!(sql.param_count(), 1);
//! ```
//!
//! ## Updates with expressions
//!
//! ```rust
//! use likesql_query::{record, Assign, Changes, Find, QueryBuilder, SqliteDialect, Value};
//!
//! let changes: Changes = record! {
//!     "hits" => Assign::expr("hits + ?", [Value::Int(1)]),
//! };
//! let sql = QueryBuilder::new(SqliteDialect)
//!     .update("ips", &changes, &Find::new("addr = ?").arg("::1"))
//!     .unwrap();
//! assert_eq!(sql.sql(), r#"UPDATE "ips" SET "hits" = hits + ? WHERE addr = ?"#);
//! ```

pub mod builder;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod find;
pub mod logging;
pub mod raw;
pub mod row;
pub mod schema;
pub mod value;

pub use builder::QueryBuilder;
pub use dialect::{Dialect, SqliteDialect};
pub use error::{ErrorCode, ErrorContext, QueryError, QueryResult};
pub use executor::{Executor, LikeSql};
pub use find::{Find, SortOrder};
pub use raw::Sql;
pub use row::{ColumnInfo, Execution, Output, Row, Rows, RunInfo, from_row};
pub use schema::{ColumnDef, ColumnType, Columns, DefaultValue, TableOptions};
pub use value::{Assign, Changes, Record, Value};

pub use async_trait::async_trait;
pub use indexmap::IndexMap;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{QueryError, QueryResult};
    pub use crate::executor::{Executor, LikeSql};
    pub use crate::find::{Find, SortOrder};
    pub use crate::raw::Sql;
    pub use crate::row::{Output, Row, Rows, RunInfo};
    pub use crate::schema::{ColumnDef, Columns, TableOptions};
    pub use crate::value::{Assign, Changes, Record, Value};
    pub use crate::{raw_query, record};
}
