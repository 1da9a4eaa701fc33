//! Application logger.
//!
//! The process-wide `tracing` subscriber is installed once in `main`, but the
//! minimum severity is owned by an explicitly constructed [`Logger`] that is
//! handed to every component that logs. `trace` is not a selectable level.

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

/// Minimum severity a [`Logger`] emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    /// Emit nothing
    Silent,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogLevelError {
    #[error("trace level is not supported, use debug instead")]
    TraceUnsupported,

    #[error("unknown log level '{0}', expected one of: debug, info, warn, error, silent")]
    Unknown(String),
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Silent => "silent",
        }
    }

    /// Directive understood by `tracing_subscriber::EnvFilter`
    fn filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            other => other.as_str(),
        }
    }
}

impl FromStr for LogLevel {
    type Err = LogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "silent" | "off" => Ok(LogLevel::Silent),
            "trace" => Err(LogLevelError::TraceUnsupported),
            other => Err(LogLevelError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Level-gated logger shared by services and components
#[derive(Debug, Clone)]
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Whether a message of `severity` passes this logger's threshold
    pub fn enabled(&self, severity: LogLevel) -> bool {
        severity != LogLevel::Silent && self.level != LogLevel::Silent && severity >= self.level
    }

    /// Filter for the process subscriber, derived from the validated level only.
    /// `RUST_LOG` is ignored.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::new(self.level.filter_directive())
    }

    pub fn debug(&self, context: &str, detail: impl fmt::Display) {
        if self.enabled(LogLevel::Debug) {
            tracing::debug!("{} {}", context, detail);
        }
    }

    pub fn info(&self, context: &str, detail: impl fmt::Display) {
        if self.enabled(LogLevel::Info) {
            tracing::info!("{} {}", context, detail);
        }
    }

    pub fn warn(&self, context: &str, detail: impl fmt::Display) {
        if self.enabled(LogLevel::Warn) {
            tracing::warn!("{} {}", context, detail);
        }
    }

    pub fn error(&self, context: &str, detail: impl fmt::Display) {
        if self.enabled(LogLevel::Error) {
            tracing::error!("{} {}", context, detail);
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::default())
    }
}
