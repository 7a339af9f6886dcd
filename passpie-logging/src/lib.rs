//! Logging setup for Passpie tools
//!
//! Tools log human-readable console lines by default; setting
//! `PASSPIE_LOG_FORMAT=json` switches to JSON lines for log shippers.
//! Filtering follows `RUST_LOG` when set, otherwise operational info
//! plus debug-level backend invocation tracing from the core crate.

use std::env;
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the output format
pub const LOG_FORMAT_ENV: &str = "PASSPIE_LOG_FORMAT";

// Backend invocations (arguments, resolved binary) log at debug in the
// core crate; surface them without drowning out everything else.
const DEFAULT_FILTER: &str = "info,passpie_gpg=debug";

/// Output format for a Passpie tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable console lines
    Console,
    /// JSON lines
    Json,
}

impl LogFormat {
    /// Parse a format name; anything unrecognized means console output
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Console
        }
    }

    /// Format from `PASSPIE_LOG_FORMAT`, defaulting to console
    pub fn from_env() -> Self {
        env::var(LOG_FORMAT_ENV)
            .map(|value| Self::parse(&value))
            .unwrap_or(LogFormat::Console)
    }
}

/// Initialize logging for a Passpie tool
///
/// The format comes from `PASSPIE_LOG_FORMAT`, the filter from
/// `RUST_LOG` with a passpie-flavored default.
pub fn init(tool_name: &str) {
    init_with_format(tool_name, LogFormat::from_env());
}

/// Initialize logging with an explicit format
pub fn init_with_format(tool_name: &str, format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Console => builder.init(),
    }

    tracing::info!(tool = tool_name, format = ?format, "Logging initialized");
}
