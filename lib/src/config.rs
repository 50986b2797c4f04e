use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;

use crate::LoggingError;

pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_INFO_FILE: &str = "info.log";
pub const DEFAULT_ERROR_FILE: &str = "error.log";
pub const DEFAULT_LEVEL: &str = "info";

/// Where and how the logging context writes.
///
/// Every field is optional in a config file; absent keys fall back to
/// `logs/info.log`, `logs/error.log`, level `info`, console on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub info_file: String,
    pub error_file: String,
    /// Root minimum severity, e.g. `"info"` or `"warn"`.
    pub level: String,
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            info_file: DEFAULT_INFO_FILE.to_string(),
            error_file: DEFAULT_ERROR_FILE.to_string(),
            level: DEFAULT_LEVEL.to_string(),
            console: true,
        }
    }
}

impl LoggingConfig {
    pub fn info_path(&self) -> PathBuf {
        self.log_dir.join(&self.info_file)
    }

    pub fn error_path(&self) -> PathBuf {
        self.log_dir.join(&self.error_file)
    }

    pub fn root_level(&self) -> Result<LevelFilter, LoggingError> {
        LevelFilter::from_str(&self.level)
            .map_err(|_| LoggingError::InvalidLevel(self.level.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = LoggingConfig::default();
        assert_eq!(config.info_path(), PathBuf::from("logs/info.log"));
        assert_eq!(config.error_path(), PathBuf::from("logs/error.log"));
        assert_eq!(config.root_level().unwrap(), LevelFilter::INFO);
    }

    #[test]
    fn test_root_level_rejects_garbage() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            ..LoggingConfig::default()
        };
        assert!(matches!(
            config.root_level(),
            Err(LoggingError::InvalidLevel(level)) if level == "loud"
        ));
    }

    #[test]
    fn test_root_level_is_case_insensitive() {
        let config = LoggingConfig {
            level: "WARN".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(config.root_level().unwrap(), LevelFilter::WARN);
    }
}
