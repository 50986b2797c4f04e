use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use medbiz::LoggingConfig;
use serde::Deserialize;

use crate::report::DEFAULT_HEAD_ROWS;

/// Optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "medbiz.toml";
pub const DEFAULT_DATA_PATH: &str = "data/telegram_medical_businesses_data.csv";

/// Loader settings. Every key may be omitted from `medbiz.toml`:
///
/// ```toml
/// data_path = "data/telegram_medical_businesses_data.csv"
/// head_rows = 5
///
/// [logging]
/// log_dir = "logs"
/// level = "info"
/// console = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Input CSV, relative paths are taken from the working directory.
    pub data_path: PathBuf,
    pub head_rows: usize,
    pub logging: LoggingConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            head_rows: DEFAULT_HEAD_ROWS,
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

impl LoaderConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Reads `dir/medbiz.toml` when it exists, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            Self::from_file(candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Absolute location of the input file for a given working directory.
    pub fn resolve_data_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.data_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_without_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = LoaderConfig::discover(tmp.path()).unwrap();
        assert_eq!(config, LoaderConfig::default());
        assert_eq!(config.head_rows, 5);
        assert_eq!(config.logging.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "head_rows = 10\n\n[logging]\nconsole = false\n",
        )
        .unwrap();

        let config = LoaderConfig::discover(tmp.path()).unwrap();
        assert_eq!(config.head_rows, 10);
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert!(!config.logging.console);
        assert_eq!(config.logging.info_file, "info.log");
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "head_rows = \"many\"\n").unwrap();
        assert!(matches!(
            LoaderConfig::discover(tmp.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_resolve_data_path() {
        let config = LoaderConfig::default();
        assert_eq!(
            config.resolve_data_path(Path::new("/srv/medbiz")),
            PathBuf::from("/srv/medbiz/data/telegram_medical_businesses_data.csv")
        );

        let absolute = LoaderConfig {
            data_path: PathBuf::from("/data/other.csv"),
            ..LoaderConfig::default()
        };
        assert_eq!(
            absolute.resolve_data_path(Path::new("/srv/medbiz")),
            PathBuf::from("/data/other.csv")
        );
    }
}
