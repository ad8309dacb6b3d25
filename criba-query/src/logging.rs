//! Logging setup for Criba.
//!
//! The engine itself only emits `tracing` events. This module installs a
//! subscriber for binaries that want one (behind the `tracing-subscriber`
//! feature), configured from the environment.
//!
//! # Environment Variables
//!
//! - `CRIBA_DEBUG=true|1|yes` - Enable debug logging
//! - `CRIBA_LOG_LEVEL=trace|debug|info|warn|error` - Set a specific level
//! - `CRIBA_LOG_FORMAT=json|pretty|compact` - Output format (default: json)
//!
//! ```rust,no_run
//! use criba_query::logging;
//!
//! logging::init();
//! ```

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Enables debug logging.
pub const DEBUG_VAR: &str = "CRIBA_DEBUG";
/// Overrides the log level.
pub const LEVEL_VAR: &str = "CRIBA_LOG_LEVEL";
/// Selects the output format.
pub const FORMAT_VAR: &str = "CRIBA_LOG_FORMAT";

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line, human oriented.
    Pretty,
    /// Single line per event.
    Compact,
}

impl LogFormat {
    /// Parse a format name; anything unknown is JSON.
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "compact" => Self::Compact,
            _ => Self::Json,
        }
    }

    /// The format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
            Self::Compact => "compact",
        }
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Whether `CRIBA_DEBUG` is on.
    pub debug: bool,
    /// Level name, e.g. `"warn"`.
    pub level: &'static str,
    /// Output format.
    pub format: LogFormat,
    /// Whether any logging was requested at all.
    pub requested: bool,
}

impl LogSettings {
    /// Resolve settings from raw variable values.
    pub fn resolve(debug: Option<&str>, level: Option<&str>, format: Option<&str>) -> Self {
        let debug = debug.is_some_and(is_truthy_flag);
        let fallback = if debug { "debug" } else { "warn" };
        let level_name = match level.map(str::to_lowercase).as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => fallback,
        };
        Self {
            debug,
            level: level_name,
            format: format.map(LogFormat::parse).unwrap_or_default(),
            requested: debug || level.is_some(),
        }
    }

    /// Resolve settings from the process environment.
    pub fn from_env() -> Self {
        let debug = env::var(DEBUG_VAR).ok();
        let level = env::var(LEVEL_VAR).ok();
        let format = env::var(FORMAT_VAR).ok();
        Self::resolve(debug.as_deref(), level.as_deref(), format.as_deref())
    }

    /// The `EnvFilter` directive for Criba's crates.
    pub fn directive(&self) -> String {
        format!("criba={0},criba_query={0},criba_cli={0}", self.level)
    }
}

fn is_truthy_flag(raw: &str) -> bool {
    matches!(raw.to_lowercase().as_str(), "true" | "1" | "yes")
}

/// Check if debug logging is enabled via `CRIBA_DEBUG`.
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var(DEBUG_VAR).is_ok_and(|v| is_truthy_flag(&v))
}

/// Install the subscriber described by the environment.
///
/// Does nothing when neither `CRIBA_DEBUG` nor `CRIBA_LOG_LEVEL` is set.
/// Subsequent calls are no-ops.
pub fn init() {
    init_with(LogSettings::from_env());
}

/// Install a subscriber with explicit settings.
///
/// Subsequent calls are no-ops.
pub fn init_with(settings: LogSettings) {
    INIT.call_once(|| {
        if !settings.requested {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let filter =
                EnvFilter::try_new(settings.directive()).unwrap_or_else(|_| EnvFilter::new("warn"));
            let registry = tracing_subscriber::registry().with(filter);

            let installed = match settings.format {
                LogFormat::Json => registry
                    .with(fmt::layer().json().with_writer(std::io::stderr))
                    .try_init(),
                LogFormat::Compact => registry
                    .with(fmt::layer().compact().with_writer(std::io::stderr))
                    .try_init(),
                LogFormat::Pretty => registry
                    .with(fmt::layer().pretty().with_writer(std::io::stderr))
                    .try_init(),
            };

            if installed.is_ok() {
                tracing::info!(
                    level = settings.level,
                    format = settings.format.as_str(),
                    "Criba logging initialized"
                );
            }
        }
    });
}

/// Debug-level event emitted only when `CRIBA_DEBUG` is on.
#[macro_export]
macro_rules! criba_debug {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            tracing::debug!($($arg)*);
        }
    };
}

/// Trace-level event emitted only when `CRIBA_DEBUG` is on.
#[macro_export]
macro_rules! criba_trace {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            tracing::trace!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_variables() {
        let settings = LogSettings::resolve(None, None, None);
        assert!(!settings.debug);
        assert!(!settings.requested);
        assert_eq!(settings.level, "warn");
        assert_eq!(settings.format, LogFormat::Json);
    }

    #[test]
    fn test_debug_flag_raises_level() {
        let settings = LogSettings::resolve(Some("YES"), None, Some("compact"));
        assert!(settings.debug);
        assert!(settings.requested);
        assert_eq!(settings.level, "debug");
        assert_eq!(settings.format, LogFormat::Compact);
    }

    #[test]
    fn test_explicit_level_wins() {
        let settings = LogSettings::resolve(Some("1"), Some("TRACE"), None);
        assert_eq!(settings.level, "trace");

        let settings = LogSettings::resolve(None, Some("loud"), None);
        assert_eq!(settings.level, "warn");
        assert!(settings.requested);
    }

    #[test]
    fn test_directive() {
        let settings = LogSettings::resolve(None, Some("info"), None);
        assert_eq!(settings.directive(), "criba=info,criba_query=info,criba_cli=info");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(LogFormat::parse("Pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("xml"), LogFormat::Json);
    }
}
