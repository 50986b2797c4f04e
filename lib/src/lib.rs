//! Shared plumbing for the medical-business data tools.
//!
//! The only piece today is logging: a [`LogContext`] built once at startup
//! and handed to whoever needs to report outcomes, with two named loggers
//! (`info_logger`, `error_logger`) writing `timestamp - LEVEL - message`
//! lines to `logs/info.log`, `logs/error.log` and the console.

pub mod config;
pub mod format;
pub mod logging;
pub mod sink;

pub use config::LoggingConfig;
pub use logging::{LogContext, LoggerName, LoggingError, NamedLogger, ERROR_LOGGER, INFO_LOGGER};
pub use sink::{LogSinks, MemorySink};
pub use tracing_subscriber::filter::LevelFilter;
