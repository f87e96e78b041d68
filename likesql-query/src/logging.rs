//! Logging setup controlled by environment variables.
//!
//! All crates log through `tracing`. Installing a subscriber is left to the
//! application unless the `tracing-subscriber` feature is enabled, in which
//! case [`init`] installs one configured from:
//!
//! - `LIKESQL_DEBUG=true|1|yes` - enable debug logging
//! - `LIKESQL_LOG_LEVEL=trace|debug|info|warn|error` - explicit level
//! - `LIKESQL_LOG_FORMAT=json|pretty|compact` - output format (default: json)
//!
//! ```rust,no_run
//! likesql_query::logging::init();
//! ```

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via `LIKESQL_DEBUG`.
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("LIKESQL_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Log level from `LIKESQL_LOG_LEVEL`.
///
/// Defaults to "debug" if `LIKESQL_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    match env::var("LIKESQL_LOG_LEVEL") {
        Ok(level) => match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

/// Log format from `LIKESQL_LOG_FORMAT`, defaulting to "json".
pub fn get_log_format() -> &'static str {
    env::var("LIKESQL_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Install the global subscriber. Subsequent calls are no-ops.
///
/// Does nothing unless `LIKESQL_DEBUG` or `LIKESQL_LOG_LEVEL` is set, or when
/// the `tracing-subscriber` feature is disabled.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("LIKESQL_LOG_LEVEL").is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!(
                "likesql={level},likesql_query={level},likesql_sqlite={level}"
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            let registry = tracing_subscriber::registry().with(filter);
            let result = match get_log_format() {
                "json" => registry.with(fmt::layer().json()).try_init(),
                "compact" => registry.with(fmt::layer().compact()).try_init(),
                _ => registry.with(fmt::layer().pretty()).try_init(),
            };

            if result.is_ok() {
                tracing::info!(level, format = get_log_format(), "likesql logging initialized");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env mutation is process-wide, so every case lives in one test.
    #[test]
    fn test_env_driven_settings() {
        // SAFETY: no other test in this crate reads these variables.
        unsafe {
            env::remove_var("LIKESQL_DEBUG");
            env::remove_var("LIKESQL_LOG_LEVEL");
            env::remove_var("LIKESQL_LOG_FORMAT");
        }
        assert!(!is_debug_enabled());
        assert_eq!(get_log_level(), "warn");
        assert_eq!(get_log_format(), "json");

        unsafe {
            env::set_var("LIKESQL_DEBUG", "yes");
        }
        assert!(is_debug_enabled());
        assert_eq!(get_log_level(), "debug");

        unsafe {
            env::set_var("LIKESQL_LOG_LEVEL", "TRACE");
            env::set_var("LIKESQL_LOG_FORMAT", "compact");
        }
        assert_eq!(get_log_level(), "trace");
        assert_eq!(get_log_format(), "compact");

        unsafe {
            env::remove_var("LIKESQL_DEBUG");
            env::remove_var("LIKESQL_LOG_LEVEL");
            env::remove_var("LIKESQL_LOG_FORMAT");
        }
    }
}
