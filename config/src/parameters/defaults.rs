//! Parameters default values

pub mod logger {
    //! Logger defaults
    use crate::logger::{Format, Level};

    /// Log level used when none is configured
    pub const DEFAULT_LEVEL: Level = Level::INFO;
    /// Output format used when none is configured
    pub const DEFAULT_FORMAT: Format = Format::Full;
}

pub mod client {
    //! Cursor client defaults
    use std::time::Duration;

    /// Requests wait for the record source indefinitely unless a timeout is configured.
    pub const DEFAULT_REQUEST_TIMEOUT: Option<Duration> = None;
}
