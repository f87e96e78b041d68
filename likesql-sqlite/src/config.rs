//! SQLite configuration.

use std::borrow::Cow;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rusqlite::OpenFlags;

use crate::error::{SqliteError, SqliteResult};

/// Environment variable read by [`SqliteConfig::from_env`].
pub const DATABASE_URL_ENV: &str = "LIKESQL_DATABASE_URL";

/// SQLite database configuration.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database path (or in-memory).
    pub path: DatabasePath,
    /// Open the database read-only.
    pub read_only: bool,
    /// Fail to open instead of creating a missing file.
    pub file_must_exist: bool,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: Option<u32>,
    /// Journal mode. Not applied to read-only connections.
    pub journal_mode: JournalMode,
    /// Synchronous mode.
    pub synchronous: SynchronousMode,
    /// Enable foreign keys.
    pub foreign_keys: bool,
    /// Cache size (in pages, negative for KiB).
    pub cache_size: Option<i32>,
    /// Called with every SQL string before it runs.
    pub verbose: Option<VerboseHook>,
}

/// Database path configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DatabasePath {
    /// In-memory database.
    #[default]
    Memory,
    /// File-based database.
    File(PathBuf),
}

impl DatabasePath {
    /// Path as shown in logs.
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            Self::Memory => Cow::Borrowed(":memory:"),
            Self::File(path) => path.to_string_lossy(),
        }
    }

    /// Check if this is an in-memory database.
    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

/// Callback receiving each SQL statement before execution.
#[derive(Clone)]
pub struct VerboseHook(Arc<dyn Fn(&str) + Send + Sync>);

impl VerboseHook {
    /// Wrap a callback.
    pub fn new(hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self(Arc::new(hook))
    }

    /// Invoke the callback.
    pub fn call(&self, sql: &str) {
        (self.0)(sql)
    }
}

impl fmt::Debug for VerboseHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerboseHook")
    }
}

/// SQLite synchronous mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SynchronousMode {
    /// Synchronous OFF - Fastest but unsafe.
    Off,
    /// Synchronous NORMAL - Good balance.
    #[default]
    Normal,
    /// Synchronous FULL - Safe but slower.
    Full,
    /// Synchronous EXTRA - Maximum safety.
    Extra,
}

impl SynchronousMode {
    /// Get the SQLite pragma value.
    pub fn as_pragma(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Normal => "NORMAL",
            Self::Full => "FULL",
            Self::Extra => "EXTRA",
        }
    }

    fn parse(value: &str) -> SqliteResult<Self> {
        match value.to_lowercase().as_str() {
            "off" | "0" => Ok(Self::Off),
            "normal" | "1" => Ok(Self::Normal),
            "full" | "2" => Ok(Self::Full),
            "extra" | "3" => Ok(Self::Extra),
            other => Err(SqliteError::config(format!("unknown synchronous mode '{}'", other))),
        }
    }
}

/// SQLite journal mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JournalMode {
    /// DELETE - Deletes journal after transaction.
    Delete,
    /// TRUNCATE - Truncates journal instead of deleting.
    Truncate,
    /// PERSIST - Keep journal file, zero out on commit.
    Persist,
    /// MEMORY - Keep journal in memory.
    Memory,
    /// WAL - Write-Ahead Logging.
    #[default]
    Wal,
    /// OFF - No journal.
    Off,
}

impl JournalMode {
    /// Get the SQLite pragma value.
    pub fn as_pragma(&self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Truncate => "TRUNCATE",
            Self::Persist => "PERSIST",
            Self::Memory => "MEMORY",
            Self::Wal => "WAL",
            Self::Off => "OFF",
        }
    }

    fn parse(value: &str) -> SqliteResult<Self> {
        match value.to_lowercase().as_str() {
            "delete" => Ok(Self::Delete),
            "truncate" => Ok(Self::Truncate),
            "persist" => Ok(Self::Persist),
            "memory" => Ok(Self::Memory),
            "wal" => Ok(Self::Wal),
            "off" => Ok(Self::Off),
            other => Err(SqliteError::config(format!("unknown journal mode '{}'", other))),
        }
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: DatabasePath::Memory,
            read_only: false,
            file_must_exist: false,
            busy_timeout_ms: Some(5000),
            journal_mode: JournalMode::Wal,
            synchronous: SynchronousMode::Normal,
            foreign_keys: true,
            cache_size: Some(-2000), // 2MB cache
            verbose: None,
        }
    }
}

impl SqliteConfig {
    /// Create a new configuration for an in-memory database.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Create a new configuration for a file-based database.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            path: DatabasePath::File(path.as_ref().to_path_buf()),
            ..Default::default()
        }
    }

    /// Read a database URL from `LIKESQL_DATABASE_URL`.
    pub fn from_env() -> SqliteResult<Self> {
        let url = env::var(DATABASE_URL_ENV)
            .map_err(|_| SqliteError::config(format!("{} is not set", DATABASE_URL_ENV)))?;
        Self::from_url(url)
    }

    /// Parse a SQLite URL into configuration.
    ///
    /// Supported formats:
    /// - `sqlite::memory:` or `:memory:` - In-memory database
    /// - `sqlite://path/to/db.sqlite` - File-based database
    /// - `sqlite:path/to/db.sqlite` - Alternative format
    /// - `file:path/to/db.sqlite` - Alternative format
    /// - `path/to/db.sqlite` - Bare path
    ///
    /// Query options: `mode=memory|ro`, `read_only`, `file_must_exist`,
    /// `busy_timeout`, `journal_mode`, `synchronous`, `foreign_keys`,
    /// `cache_size`.
    ///
    /// ```rust
    /// use likesql_sqlite::{JournalMode, SqliteConfig};
    ///
    /// let config = SqliteConfig::from_url("sqlite://./app.db?mode=ro&busy_timeout=250").unwrap();
    /// assert!(config.read_only);
    /// assert_eq!(config.busy_timeout_ms, Some(250));
    /// assert_eq!(config.journal_mode, JournalMode::Wal);
    /// ```
    pub fn from_url(url: impl AsRef<str>) -> SqliteResult<Self> {
        let url_str = url.as_ref();
        let (location, query) = match url_str.split_once('?') {
            Some((location, query)) => (location, Some(query)),
            None => (url_str, None),
        };

        let path = if let Some(rest) = location.strip_prefix("sqlite://") {
            rest
        } else if let Some(rest) = location.strip_prefix("sqlite:") {
            rest
        } else if let Some(rest) = location.strip_prefix("file:") {
            rest
        } else {
            location
        };

        let mut config = match path {
            ":memory:" => Self::memory(),
            "" => return Err(SqliteError::config("database path is required")),
            path => Self::file(path),
        };

        for pair in query.into_iter().flat_map(|q| q.split('&')) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, "true"));
            match key {
                "mode" => match value {
                    "memory" => config.path = DatabasePath::Memory,
                    "ro" => config.read_only = true,
                    "rw" => config.file_must_exist = true,
                    "rwc" => {}
                    other => {
                        return Err(SqliteError::config(format!("unknown mode '{}'", other)));
                    }
                },
                "read_only" => config.read_only = parse_flag(value),
                "file_must_exist" => config.file_must_exist = parse_flag(value),
                "foreign_keys" => config.foreign_keys = parse_flag(value),
                "busy_timeout" => {
                    let ms = value.parse().map_err(|_| {
                        SqliteError::config(format!("invalid busy_timeout '{}'", value))
                    })?;
                    config.busy_timeout_ms = Some(ms);
                }
                "cache_size" => {
                    let size = value.parse().map_err(|_| {
                        SqliteError::config(format!("invalid cache_size '{}'", value))
                    })?;
                    config.cache_size = Some(size);
                }
                "synchronous" => config.synchronous = SynchronousMode::parse(value)?,
                "journal_mode" => config.journal_mode = JournalMode::parse(value)?,
                _ => {}
            }
        }

        Ok(config)
    }

    /// Flags passed to `sqlite3_open_v2`.
    pub fn open_flags(&self) -> OpenFlags {
        let base = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if self.read_only {
            base | OpenFlags::SQLITE_OPEN_READ_ONLY
        } else if self.file_must_exist {
            base | OpenFlags::SQLITE_OPEN_READ_WRITE
        } else {
            base | OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
        }
    }

    /// Busy timeout as a duration.
    pub fn busy_timeout_duration(&self) -> Option<Duration> {
        self.busy_timeout_ms.map(|ms| Duration::from_millis(u64::from(ms)))
    }

    /// Generate the initialization SQL for this configuration.
    pub fn init_sql(&self) -> String {
        let mut sql = String::new();

        sql.push_str(&format!(
            "PRAGMA foreign_keys = {};\n",
            if self.foreign_keys { "ON" } else { "OFF" }
        ));

        // Changing the journal mode writes to the database header.
        if !self.read_only {
            sql.push_str(&format!(
                "PRAGMA journal_mode = {};\n",
                self.journal_mode.as_pragma()
            ));
        }

        sql.push_str(&format!(
            "PRAGMA synchronous = {};\n",
            self.synchronous.as_pragma()
        ));

        if let Some(cache) = self.cache_size {
            sql.push_str(&format!("PRAGMA cache_size = {};\n", cache));
        }

        sql
    }

    /// Set the database path.
    pub fn path(mut self, path: DatabasePath) -> Self {
        self.path = path;
        self
    }

    /// Open read-only.
    pub fn read_only(mut self, enabled: bool) -> Self {
        self.read_only = enabled;
        self
    }

    /// Require the database file to exist already.
    pub fn file_must_exist(mut self, enabled: bool) -> Self {
        self.file_must_exist = enabled;
        self
    }

    /// Enable or disable foreign keys.
    pub fn foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    /// Set the busy timeout in milliseconds.
    pub fn busy_timeout(mut self, ms: u32) -> Self {
        self.busy_timeout_ms = Some(ms);
        self
    }

    /// Set the cache size.
    pub fn cache_size(mut self, size: i32) -> Self {
        self.cache_size = Some(size);
        self
    }

    /// Set the synchronous mode.
    pub fn synchronous(mut self, mode: SynchronousMode) -> Self {
        self.synchronous = mode;
        self
    }

    /// Set the journal mode.
    pub fn journal_mode(mut self, mode: JournalMode) -> Self {
        self.journal_mode = mode;
        self
    }

    /// Receive every SQL string before it runs.
    pub fn verbose(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.verbose = Some(VerboseHook::new(hook));
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_config_memory() {
        let config = SqliteConfig::memory();
        assert!(config.path.is_memory());
        assert_eq!(config.path.display(), ":memory:");
    }

    #[test]
    fn test_config_file() {
        let config = SqliteConfig::file("test.db");
        assert!(!config.path.is_memory());
        assert_eq!(config.path.display(), "test.db");
    }

    #[test]
    fn test_config_from_url_memory() {
        assert!(SqliteConfig::from_url("sqlite::memory:").unwrap().path.is_memory());
        assert!(SqliteConfig::from_url(":memory:").unwrap().path.is_memory());
        assert!(
            SqliteConfig::from_url("file:x.db?mode=memory")
                .unwrap()
                .path
                .is_memory()
        );
    }

    #[test]
    fn test_config_from_url_file() {
        let config = SqliteConfig::from_url("sqlite://./test.db").unwrap();
        assert_eq!(config.path, DatabasePath::File(PathBuf::from("./test.db")));

        let config = SqliteConfig::from_url("data/app.db").unwrap();
        assert_eq!(config.path, DatabasePath::File(PathBuf::from("data/app.db")));
    }

    #[test]
    fn test_config_from_url_requires_path() {
        assert!(matches!(
            SqliteConfig::from_url("sqlite://"),
            Err(SqliteError::Config(_))
        ));
    }

    #[test]
    fn test_config_from_url_with_options() {
        let config = SqliteConfig::from_url(
            "sqlite://./test.db?foreign_keys=false&busy_timeout=10000&synchronous=full&journal_mode=delete&file_must_exist",
        )
        .unwrap();

        assert!(!config.foreign_keys);
        assert!(config.file_must_exist);
        assert_eq!(config.busy_timeout_ms, Some(10000));
        assert_eq!(config.synchronous, SynchronousMode::Full);
        assert_eq!(config.journal_mode, JournalMode::Delete);
    }

    #[test]
    fn test_config_from_url_rejects_bad_values() {
        assert!(SqliteConfig::from_url("a.db?busy_timeout=soon").is_err());
        assert!(SqliteConfig::from_url("a.db?journal_mode=fast").is_err());
        assert!(SqliteConfig::from_url("a.db?mode=weird").is_err());
    }

    #[test]
    fn test_open_flags() {
        let flags = SqliteConfig::memory().open_flags();
        assert!(flags.contains(OpenFlags::SQLITE_OPEN_CREATE));
        assert!(flags.contains(OpenFlags::SQLITE_OPEN_READ_WRITE));

        let flags = SqliteConfig::memory().file_must_exist(true).open_flags();
        assert!(!flags.contains(OpenFlags::SQLITE_OPEN_CREATE));
        assert!(flags.contains(OpenFlags::SQLITE_OPEN_READ_WRITE));

        let flags = SqliteConfig::memory().read_only(true).open_flags();
        assert!(flags.contains(OpenFlags::SQLITE_OPEN_READ_ONLY));
        assert!(!flags.contains(OpenFlags::SQLITE_OPEN_READ_WRITE));
        assert!(!flags.contains(OpenFlags::SQLITE_OPEN_CREATE));
    }

    #[test]
    fn test_init_sql() {
        let sql = SqliteConfig::default().init_sql();
        assert!(sql.contains("foreign_keys = ON"));
        assert!(sql.contains("journal_mode = WAL"));
        assert!(sql.contains("synchronous = NORMAL"));
        assert!(sql.contains("cache_size = -2000"));
    }

    #[test]
    fn test_init_sql_read_only_skips_journal_mode() {
        let sql = SqliteConfig::default().read_only(true).init_sql();
        assert!(!sql.contains("journal_mode"));
    }

    #[test]
    fn test_from_env() {
        // SAFETY: no other test in this crate reads this variable.
        unsafe {
            env::remove_var(DATABASE_URL_ENV);
        }
        let err = SqliteConfig::from_env().unwrap_err();
        assert!(matches!(err, SqliteError::Config(ref msg) if msg.contains(DATABASE_URL_ENV)));

        unsafe {
            env::set_var(DATABASE_URL_ENV, "sqlite://./data/app.db?mode=ro&cache_size=-500");
        }
        let config = SqliteConfig::from_env().unwrap();
        assert_eq!(config.path, DatabasePath::File(PathBuf::from("./data/app.db")));
        assert!(config.read_only);
        assert_eq!(config.cache_size, Some(-500));

        unsafe {
            env::remove_var(DATABASE_URL_ENV);
        }
    }

    #[test]
    fn test_builder_pattern() {
        let config = SqliteConfig::memory()
            .foreign_keys(false)
            .busy_timeout(3000)
            .synchronous(SynchronousMode::Full)
            .journal_mode(JournalMode::Memory);

        assert!(!config.foreign_keys);
        assert_eq!(config.busy_timeout_duration(), Some(Duration::from_millis(3000)));
        assert_eq!(config.synchronous, SynchronousMode::Full);
        assert_eq!(config.journal_mode, JournalMode::Memory);
    }

    #[test]
    fn test_verbose_hook() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let config = SqliteConfig::memory().verbose(move |sql| {
            sink.lock().unwrap().push(sql.to_string());
        });

        let hook = config.verbose.clone().unwrap();
        hook.call("SELECT 1");
        assert_eq!(*seen.lock().unwrap(), vec!["SELECT 1".to_string()]);
        assert_eq!(format!("{:?}", hook), "VerboseHook");
    }
}
