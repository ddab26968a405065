//! User configuration view. Contains structures in a format that is
//! convenient from the user perspective. It is less strict and not necessarily valid upon
//! successful parsing of the user-provided content.
//!
//! Every field is optional; [`Complete`] fills in the defaults.

// This module's usage is documented in the field names themselves
#![allow(missing_docs)]

use std::{fs, path::Path, time::Duration};

use eyre::{eyre, WrapErr};
use serde::{Deserialize, Serialize};

use crate::{
    logger::{self, Format, Level},
    parameters::{actual, defaults},
    Complete, CompleteError, CompleteResult,
};

/// Overrides `logger.level`
pub const ENV_LOG_LEVEL: &str = "PAGE_CURSOR_LOG_LEVEL";
/// Overrides `logger.format`
pub const ENV_LOG_FORMAT: &str = "PAGE_CURSOR_LOG_FORMAT";
/// Overrides `client.request_timeout_ms`
pub const ENV_REQUEST_TIMEOUT_MS: &str = "PAGE_CURSOR_REQUEST_TIMEOUT_MS";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct Root {
    pub logger: Logger,
    pub client: Client,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct Logger {
    pub level: Option<Level>,
    pub format: Option<Format>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct Client {
    pub request_timeout_ms: Option<u64>,
}

impl Root {
    /// Read the layer from TOML file
    ///
    /// # Errors
    /// - If file is not found, or not a valid TOML
    /// - If the TOML contains unknown fields
    pub fn from_toml(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .wrap_err_with(|| eyre!("cannot open file at location `{}`", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// Parse the layer from TOML text
    ///
    /// # Errors
    /// If the text is not valid TOML or contains unknown fields
    pub fn from_toml_str(contents: &str) -> eyre::Result<Self> {
        toml::from_str(contents).wrap_err("failed to parse toml")
    }

    /// Read the layer from the process environment
    ///
    /// # Errors
    /// If a variable is set to a value that cannot be parsed
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Read the layer using `read` to look variables up
    ///
    /// # Errors
    /// If a variable is set to a value that cannot be parsed
    pub fn from_env_with(read: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let level = read(ENV_LOG_LEVEL)
            .map(|value| value.parse::<Level>())
            .transpose()
            .wrap_err_with(|| eyre!("failed to read `{ENV_LOG_LEVEL}`"))?;
        let format = read(ENV_LOG_FORMAT)
            .map(|value| value.parse::<Format>())
            .transpose()
            .wrap_err_with(|| eyre!("failed to read `{ENV_LOG_FORMAT}`"))?;
        let request_timeout_ms = read(ENV_REQUEST_TIMEOUT_MS)
            .map(|value| value.trim().parse::<u64>())
            .transpose()
            .wrap_err_with(|| eyre!("failed to read `{ENV_REQUEST_TIMEOUT_MS}`"))?;

        Ok(Self {
            logger: Logger { level, format },
            client: Client { request_timeout_ms },
        })
    }

    /// Overlay `other` on top of `self`. Values set in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            logger: Logger {
                level: other.logger.level.or(self.logger.level),
                format: other.logger.format.or(self.logger.format),
            },
            client: Client {
                request_timeout_ms: other
                    .client
                    .request_timeout_ms
                    .or(self.client.request_timeout_ms),
            },
        }
    }
}

impl Complete for Logger {
    type Output = logger::Config;

    fn complete(self) -> CompleteResult<Self::Output> {
        Ok(logger::Config {
            level: self.level.unwrap_or(defaults::logger::DEFAULT_LEVEL),
            format: self.format.unwrap_or(defaults::logger::DEFAULT_FORMAT),
        })
    }
}

impl Complete for Client {
    type Output = actual::Client;

    fn complete(self) -> CompleteResult<Self::Output> {
        let request_timeout = match self.request_timeout_ms {
            Some(0) => {
                return Err(CompleteError::Invalid {
                    field: "client.request_timeout_ms",
                    reason: "must be greater than zero".to_owned(),
                })
            }
            Some(ms) => Some(Duration::from_millis(ms)),
            None => defaults::client::DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(actual::Client { request_timeout })
    }
}

impl Complete for Root {
    type Output = actual::Root;

    fn complete(self) -> CompleteResult<Self::Output> {
        Ok(actual::Root {
            logger: self.logger.complete()?,
            client: self.client.complete()?,
        })
    }
}
