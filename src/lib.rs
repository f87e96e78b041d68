//! # likesql
//!
//! Asynchronous CRUD over an embedded SQLite database with a uniform,
//! engine-agnostic result shape.
//!
//! likesql provides:
//! - A fixed CRUD surface (`insert`, `select`, `select_one`, `exists`, `count`,
//!   `update`, `delete`, `execute`, `query`, `create_table`, `drop_table`)
//! - Parameterized statement templates, never string-spliced values
//! - Rows as JSON objects, deserializable into any `serde` type
//! - Stable error codes, with unique violations surfacing as `DuplicateEntry`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use likesql::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), likesql::QueryError> {
//!     let db = LikeSqlite::open(SqliteConfig::file("ips.db")).await?;
//!     db.execute(
//!         "CREATE TABLE IF NOT EXISTS ips (addr TEXT UNIQUE, hits INTEGER NOT NULL)",
//!         vec![],
//!     )
//!     .await?;
//!
//!     match db.insert("ips", &record! { "addr" => "::1", "hits" => 1 }).await {
//!         Err(e) if e.is_duplicate_entry() => {
//!             let bump: Changes = record! { "hits" => Assign::expr("hits + ?", [Value::Int(1)]) };
//!             db.update("ips", &bump, &Find::new("addr = ?").arg("::1")).await?;
//!         }
//!         other => {
//!             other?;
//!         }
//!     }
//!
//!     let total = db.count("ips", &Find::all()).await?;
//!     println!("{} addresses", total);
//!     db.close().await
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use likesql_query::*;

/// The embedded SQLite adapter.
#[cfg(feature = "sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "sqlite")))]
pub mod sqlite {
    pub use likesql_sqlite::*;
}

#[cfg(feature = "sqlite")]
pub use likesql_sqlite::{LikeSqlite, SqliteConfig};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use likesql_query::prelude::*;

    #[cfg(feature = "sqlite")]
    pub use likesql_sqlite::{LikeSqlite, SqliteConfig};
}
