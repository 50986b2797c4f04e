use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::dispatcher::SetGlobalDefaultError;
use tracing::{debug, Dispatch, Level};
use tracing_subscriber::filter::{filter_fn, LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;

use crate::config::LoggingConfig;
use crate::format::LineFormat;
use crate::sink::{append_file, LogSinks};

/// Target used by the logger that reports successful outcomes.
pub const INFO_LOGGER: &str = "info_logger";
/// Target used by the logger that reports failures.
pub const ERROR_LOGGER: &str = "error_logger";

/// The two named loggers callers can obtain from a [`LogContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoggerName {
    Info,
    Error,
}

impl LoggerName {
    pub const fn as_str(self) -> &'static str {
        match self {
            LoggerName::Info => INFO_LOGGER,
            LoggerName::Error => ERROR_LOGGER,
        }
    }

    /// Least severe level this logger lets through.
    pub const fn threshold(self) -> Level {
        match self {
            LoggerName::Info => Level::INFO,
            LoggerName::Error => Level::ERROR,
        }
    }
}

impl fmt::Display for LoggerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while bootstrapping logging.
#[derive(Debug)]
pub enum LoggingError {
    CreateDir { path: PathBuf, source: io::Error },
    OpenFile { path: PathBuf, source: io::Error },
    InvalidLevel(String),
    GlobalDefault(SetGlobalDefaultError),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggingError::CreateDir { path, source } => {
                write!(f, "failed to create log directory {}: {source}", path.display())
            }
            LoggingError::OpenFile { path, source } => {
                write!(f, "failed to open log file {}: {source}", path.display())
            }
            LoggingError::InvalidLevel(level) => write!(f, "invalid log level {level:?}"),
            LoggingError::GlobalDefault(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggingError::CreateDir { source, .. } | LoggingError::OpenFile { source, .. } => {
                Some(source)
            }
            LoggingError::GlobalDefault(e) => Some(e),
            LoggingError::InvalidLevel(_) => None,
        }
    }
}

impl From<SetGlobalDefaultError> for LoggingError {
    fn from(e: SetGlobalDefaultError) -> Self {
        Self::GlobalDefault(e)
    }
}

/// Explicitly constructed logging state.
///
/// Owns a `tracing` dispatcher wired to an informational sink, an error sink
/// and an optional console. Nothing is installed globally unless
/// [`LogContext::install_global`] is called, so several contexts can live
/// side by side (one per test, for instance).
///
/// Routing:
/// - `info_logger` passes INFO and above, `error_logger` passes ERROR only,
///   every other target uses the root level.
/// - the informational sink gets passing records below ERROR,
///   the error sink gets ERROR records, the console gets all of them.
#[derive(Debug, Clone)]
pub struct LogContext {
    dispatch: Dispatch,
}

impl LogContext {
    /// Creates the log directory if needed, opens both log files for
    /// appending and writes to stderr when `config.console` is set.
    pub fn init(config: &LoggingConfig) -> Result<Self, LoggingError> {
        let root_level = config.root_level()?;

        fs::create_dir_all(&config.log_dir).map_err(|source| LoggingError::CreateDir {
            path: config.log_dir.clone(),
            source,
        })?;

        let info = open_log_file(&config.info_path())?;
        let error = open_log_file(&config.error_path())?;

        let mut sinks = LogSinks::new(info, error);
        if config.console {
            sinks = sinks.with_console(io::stderr);
        }

        let context = Self::with_sinks(root_level, sinks);
        context.in_scope(|| debug!(log_dir = %config.log_dir.display(), "logging initialized"));
        Ok(context)
    }

    /// Builds a context over caller-supplied sinks. Touches no files.
    pub fn with_sinks(root_level: LevelFilter, sinks: LogSinks) -> Self {
        let thresholds = Targets::new()
            .with_target(INFO_LOGGER, LoggerName::Info.threshold())
            .with_target(ERROR_LOGGER, LoggerName::Error.threshold())
            .with_default(root_level);

        let info_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(sinks.info)
            .event_format(LineFormat)
            .with_filter(filter_fn(|meta| *meta.level() != Level::ERROR));

        let error_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(sinks.error)
            .event_format(LineFormat)
            .with_filter(LevelFilter::ERROR);

        let console_layer = sinks.console.map(|writer| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .event_format(LineFormat)
        });

        let subscriber = tracing_subscriber::registry()
            .with(thresholds)
            .with(info_layer)
            .with(error_layer)
            .with(console_layer);

        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    pub fn info_logger(&self) -> NamedLogger {
        self.logger(LoggerName::Info)
    }

    pub fn error_logger(&self) -> NamedLogger {
        self.logger(LoggerName::Error)
    }

    pub fn logger(&self, name: LoggerName) -> NamedLogger {
        NamedLogger {
            name,
            dispatch: self.dispatch.clone(),
        }
    }

    /// Runs `f` with this context as the current thread's default dispatcher,
    /// so plain `tracing` macros inside `f` reach the same sinks.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Makes this context the process-wide default. Can only succeed once per
    /// process.
    pub fn install_global(&self) -> Result<(), LoggingError> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())?;
        Ok(())
    }
}

fn open_log_file(path: &Path) -> Result<std::sync::Mutex<fs::File>, LoggingError> {
    append_file(path).map_err(|source| LoggingError::OpenFile {
        path: path.to_path_buf(),
        source,
    })
}

// `tracing` needs the target and level as constants, so each combination
// gets its own callsite.
macro_rules! event_at {
    ($target:expr, $level:expr, $message:expr) => {
        if $level == Level::ERROR {
            tracing::event!(target: $target, Level::ERROR, "{}", $message)
        } else if $level == Level::WARN {
            tracing::event!(target: $target, Level::WARN, "{}", $message)
        } else if $level == Level::INFO {
            tracing::event!(target: $target, Level::INFO, "{}", $message)
        } else if $level == Level::DEBUG {
            tracing::event!(target: $target, Level::DEBUG, "{}", $message)
        } else {
            tracing::event!(target: $target, Level::TRACE, "{}", $message)
        }
    };
}

/// Handle to one of the context's named loggers.
///
/// Records below the logger's threshold are dropped without error.
#[derive(Debug, Clone)]
pub struct NamedLogger {
    name: LoggerName,
    dispatch: Dispatch,
}

impl NamedLogger {
    pub fn name(&self) -> &'static str {
        self.name.as_str()
    }

    pub fn threshold(&self) -> Level {
        self.name.threshold()
    }

    /// Whether a record at `level` clears this logger's threshold.
    pub fn is_enabled(&self, level: Level) -> bool {
        level <= self.name.threshold()
    }

    pub fn log(&self, level: Level, message: impl fmt::Display) {
        let message = &message as &dyn fmt::Display;
        tracing::dispatcher::with_default(&self.dispatch, || match self.name {
            LoggerName::Info => event_at!(INFO_LOGGER, level, message),
            LoggerName::Error => event_at!(ERROR_LOGGER, level, message),
        });
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.log(Level::ERROR, message);
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.log(Level::WARN, message);
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.log(Level::INFO, message);
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Level::DEBUG, message);
    }
}
