//! Loads the medical-business CSV export into a [`Table`] and prints basic
//! diagnostics: the first rows, the shape and per-column missing values.
//!
//! Outcomes are reported through a [`medbiz::LogContext`]; see
//! [`load_and_report`].

pub mod config;
pub mod error;
pub mod report;
pub mod runner;
pub mod table;

pub use config::{ConfigError, LoaderConfig, CONFIG_FILE};
pub use error::LoadError;
pub use report::{Report, DEFAULT_HEAD_ROWS};
pub use runner::load_and_report;
pub use table::{load_table, Table};
