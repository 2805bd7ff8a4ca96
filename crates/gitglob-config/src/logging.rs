//! Structured logging utilities for gitglob components.
//!
//! Provides consistent logging with component prefixes and structured fields.
//!
//! # Usage
//!
//! ```ignore
//! use gitglob_config::{log_cli_info, log_match_debug};
//!
//! log_cli_info!("Loaded rules", count = 12);
//! log_match_debug!("Evaluated path", path = %path, ignored = true);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, EnvFilter, Registry};

/// Component identifiers for log filtering
pub struct Component;

impl Component {
    pub const CLI: &'static str = "CLI";
    pub const CONFIG: &'static str = "CONFIG";
    pub const MATCH: &'static str = "MATCH";
}

/// Log levels for runtime configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

// === CLI logging macros ===

#[macro_export]
macro_rules! log_cli_warn {
    ($msg:literal $(, $($field:tt)+)?) => {
        tracing::warn!(component = "CLI", $($($field)+,)? $msg)
    };
}

#[macro_export]
macro_rules! log_cli_info {
    ($msg:literal $(, $($field:tt)+)?) => {
        tracing::info!(component = "CLI", $($($field)+,)? $msg)
    };
}

#[macro_export]
macro_rules! log_cli_debug {
    ($msg:literal $(, $($field:tt)+)?) => {
        tracing::debug!(component = "CLI", $($($field)+,)? $msg)
    };
}

// === CONFIG logging macros ===

#[macro_export]
macro_rules! log_config_warn {
    ($msg:literal $(, $($field:tt)+)?) => {
        tracing::warn!(component = "CONFIG", $($($field)+,)? $msg)
    };
}

#[macro_export]
macro_rules! log_config_debug {
    ($msg:literal $(, $($field:tt)+)?) => {
        tracing::debug!(component = "CONFIG", $($($field)+,)? $msg)
    };
}

// === MATCH logging macros ===

#[macro_export]
macro_rules! log_match_debug {
    ($msg:literal $(, $($field:tt)+)?) => {
        tracing::debug!(component = "MATCH", $($($field)+,)? $msg)
    };
}

/// Handle to the installed filter, for applying the configured level once
/// the config has been loaded.
pub struct LoggingHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LoggingHandle {
    /// Switch to `level`. No-op when `GITGLOB_LOG`/`RUST_LOG` chose the filter.
    pub fn set_level(&self, level: LogLevel) {
        if self.from_env {
            return;
        }
        if let Err(err) = self.filter.reload(EnvFilter::new(level.as_filter())) {
            log_cli_warn!("Failed to change log level", error = %err);
        }
    }
}

/// Initialize logging with the given level filter.
/// Call this once at application startup, before loading config, so config
/// warnings are not lost.
///
/// `GITGLOB_LOG` takes precedence over `RUST_LOG`; `level` applies when
/// neither is set. Output goes to stderr so it never mixes with results.
pub fn init_logging(level: LogLevel) -> LoggingHandle {
    let (env_filter, from_env) = match EnvFilter::try_from_env("GITGLOB_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
    {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(level.as_filter()), false),
    };
    let (filter, handle) = reload::Layer::new(env_filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    LoggingHandle {
        filter: handle,
        from_env,
    }
}
