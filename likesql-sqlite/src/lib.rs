//! Embedded SQLite adapter for likesql.
//!
//! [`LikeSqlite`] implements the [`Executor`](likesql_query::Executor) seam
//! over a single `tokio-rusqlite` connection, so it answers the whole
//! [`LikeSql`](likesql_query::LikeSql) CRUD surface:
//!
//! - `insert` returns the last inserted rowid
//! - `update` and `delete` return the number of changed rows
//! - `select`, `exists` and `count` return rows as JSON objects
//! - `execute` and `query` return rows plus fields for readers, run info otherwise
//! - unique and primary key violations surface as `ErrorCode::DuplicateEntry`
//!
//! # Example
//!
//! ```rust,no_run
//! use likesql_query::{Find, LikeSql, record};
//! use likesql_sqlite::{LikeSqlite, SqliteConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SqliteConfig::from_url("sqlite://./mydb.db?busy_timeout=2000")?;
//!     let db = LikeSqlite::open(config).await?;
//!
//!     db.insert("users", &record! { "name" => "Ann" }).await?;
//!     let n = db.count("users", &Find::all()).await?;
//!     println!("{} users", n);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod connection;
pub mod engine;
pub mod error;
pub mod types;

pub use config::{DatabasePath, JournalMode, SqliteConfig, SynchronousMode, VerboseHook};
pub use connection::SqliteConnection;
pub use engine::LikeSqlite;
pub use error::{SqliteError, SqliteResult};
