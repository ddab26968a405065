//! Logging for the page cursor crates.
//!
//! One global `tracing` subscriber per process: a reloadable level filter, an
//! `fmt` layer in the configured [`Format`] and an error layer capturing span
//! traces for `color_eyre` reports. Library crates only emit events through the
//! re-exported macros; binaries and tests decide who installs the subscriber.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    OnceLock,
};

use color_eyre::{eyre::eyre, Report, Result};
use page_cursor_config::{
    parameters::user::{self, Logger as UserLogger},
    Complete as _,
};
pub use page_cursor_config::logger::{Config, Format, Level};
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
    Instrument,
};
use tracing::Subscriber;
use tracing_core::LevelFilter;
use tracing_subscriber::{
    fmt::{writer::BoxMakeWriter, TestWriter},
    layer::SubscriberExt as _,
    registry::LookupSpan,
    reload, Layer, Registry,
};

/// Who took the global logger slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Claim {
    Installed,
    Disabled,
}

static CLAIM: OnceLock<Claim> = OnceLock::new();

fn claim(by: Claim) -> Result<()> {
    let mut won = false;
    let holder = *CLAIM.get_or_init(|| {
        won = true;
        by
    });
    if won {
        return Ok(());
    }
    match holder {
        Claim::Installed => Err(eyre!("Global logger is already installed")),
        Claim::Disabled => Err(eyre!("Global logger is disabled")),
    }
}

/// Handle to the installed logger.
#[derive(Clone)]
pub struct LoggerHandle {
    level: reload::Handle<LevelFilter, Registry>,
}

impl core::fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoggerHandle").finish_non_exhaustive()
    }
}

impl LoggerHandle {
    /// Replace the maximum level of emitted events.
    ///
    /// # Errors
    /// If the subscriber behind the handle is gone.
    pub fn reload_level(&self, level: Level) -> Result<()> {
        self.level
            .reload(level_filter(level))
            .map_err(|err| eyre!("Failed to reload log level: {err}"))
    }
}

/// Install the global subscriber described by `config`, writing to stderr.
///
/// Succeeds once per process; later calls fail, as do calls after
/// [`disable_global`]. Tests should use [`test_logger`] instead.
///
/// # Errors
/// If the global logger was already claimed.
pub fn init_global(config: &Config, terminal_colors: bool) -> Result<LoggerHandle> {
    install(config, terminal_colors, BoxMakeWriter::new(std::io::stderr))
}

fn install(config: &Config, terminal_colors: bool, writer: BoxMakeWriter) -> Result<LoggerHandle> {
    claim(Claim::Installed)?;

    let (level, handle) = reload::Layer::new(level_filter(config.level));
    let subscriber = Registry::default()
        .with(level)
        .with(fmt_layer(config.format, terminal_colors, writer))
        .with(tracing_error::ErrorLayer::default());
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(LoggerHandle { level: handle })
}

/// Keep the process silent: every later [`init_global`] fails.
///
/// # Errors
/// If the global logger was already claimed.
pub fn disable_global() -> Result<()> {
    claim(Claim::Disabled)
}

/// Global logger shared by all tests of a process, installed on first use.
///
/// Logs at `DEBUG` in the pretty format unless `PAGE_CURSOR_LOG_LEVEL` or
/// `PAGE_CURSOR_LOG_FORMAT` say otherwise.
///
/// # Panics
/// If [`init_global`] or [`disable_global`] ran first, or the environment
/// holds an unparsable override.
pub fn test_logger() -> LoggerHandle {
    static LOGGER: OnceLock<LoggerHandle> = OnceLock::new();

    LOGGER
        .get_or_init(|| {
            let overrides = user::Root::from_env()
                .expect("log overrides in the environment should parse")
                .logger;
            let config = UserLogger {
                level: overrides.level.or(Some(Level::DEBUG)),
                format: overrides.format.or(Some(Format::Pretty)),
            }
            .complete()
            .expect("logger fields all have defaults");

            // captured per test by the harness
            install(&config, true, BoxMakeWriter::new(TestWriter::new))
                .expect("no global logger should be claimed before `test_logger()`")
        })
        .clone()
}

/// Install `color_eyre` report and panic hooks, once per process.
///
/// # Errors
/// If `color_eyre` fails to install its hooks.
pub fn install_panic_hook() -> Result<(), Report> {
    static INSTALLED: AtomicBool = AtomicBool::new(false);

    if INSTALLED.swap(true, Ordering::AcqRel) {
        return Ok(());
    }
    color_eyre::install()
}

fn level_filter(level: Level) -> LevelFilter {
    LevelFilter::from_level(level.into())
}

fn fmt_layer<S>(
    format: Format,
    terminal_colors: bool,
    writer: BoxMakeWriter,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(terminal_colors)
        .with_writer(writer);

    match format {
        Format::Full => layer.boxed(),
        Format::Compact => layer.compact().boxed(),
        Format::Pretty => layer.pretty().boxed(),
        Format::Json => layer.json().boxed(),
    }
}

pub mod prelude {
    //! Items needed to log from a crate without depending on `tracing` directly.

    pub use tracing::{self, debug, error, info, span, trace, warn, Span};
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use super::*;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn events_go_to_the_given_writer() {
        let buffer = Buffer::default();
        let writer = {
            let buffer = buffer.clone();
            BoxMakeWriter::new(move || buffer.clone())
        };
        let subscriber = Registry::default().with(fmt_layer(Format::Compact, false, writer));

        tracing::subscriber::with_default(subscriber, || info!(page = 3, "Fetching page"));

        let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(written.contains("Fetching page"), "{written}");
        assert!(written.contains("page=3"), "{written}");
    }
}
