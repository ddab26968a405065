//! "Actual" layer of configuration parameters. It contains strongly-typed validated
//! structures ready to be handed to the logger and the cursor clients.

use std::{path::Path, time::Duration};

use eyre::WrapErr;

use crate::{logger, parameters::user, Complete};

/// Parsed configuration root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    /// Logger configuration
    pub logger: logger::Config,
    /// Cursor client configuration
    pub client: Client,
}

/// Cursor client configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Client {
    /// Upper bound on a single `init`/`getPage` call. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Root {
    /// Read the optional TOML file at `path`, overlay the environment and fill in defaults.
    ///
    /// # Errors
    /// If the file cannot be read or parsed, an environment variable is
    /// malformed, or a value fails validation.
    pub fn load(path: Option<&Path>) -> eyre::Result<Self> {
        let file = path
            .map(|path| user::Root::from_toml(path))
            .transpose()?
            .unwrap_or_default();
        let env = user::Root::from_env()?;

        file.merge(env)
            .complete()
            .wrap_err("invalid configuration")
    }
}
