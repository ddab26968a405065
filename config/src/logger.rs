//! Logger configuration values.
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum verbosity of emitted events, spelled the way users write it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum Level {
    /// Every scan step, including ledger bookkeeping
    TRACE,
    /// Every request to a record source
    DEBUG,
    /// Lifecycle of the cursor
    #[default]
    INFO,
    /// Failed requests
    WARN,
    /// Nothing but errors
    ERROR,
}

impl From<Level> for tracing::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::TRACE => Self::TRACE,
            Level::DEBUG => Self::DEBUG,
            Level::INFO => Self::INFO,
            Level::WARN => Self::WARN,
            Level::ERROR => Self::ERROR,
        }
    }
}

/// Output format, one per `tracing_subscriber::fmt` formatter
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// Full output, one event per line
    #[default]
    Full,
    /// Shorter lines, span context inlined
    Compact,
    /// Multi-line human readable output
    Pretty,
    /// Newline-delimited JSON
    Json,
}

/// Complete logger configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// Level of logging verbosity
    pub level: Level,
    /// Output format
    pub format: Format,
}

/// Error of parsing [`Level`] or [`Format`] from a string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} `{value}`")]
pub struct ParseError {
    kind: &'static str,
    value: String,
}

impl FromStr for Level {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Self::TRACE),
            "DEBUG" => Ok(Self::DEBUG),
            "INFO" => Ok(Self::INFO),
            "WARN" => Ok(Self::WARN),
            "ERROR" => Ok(Self::ERROR),
            _ => Err(ParseError {
                kind: "log level",
                value: s.to_owned(),
            }),
        }
    }
}

impl FromStr for Format {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(ParseError {
                kind: "log format",
                value: s.to_owned(),
            }),
        }
    }
}
