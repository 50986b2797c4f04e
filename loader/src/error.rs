use std::fmt;
use std::io;
use std::path::PathBuf;

/// Why a CSV file could not be turned into a [`crate::Table`].
#[derive(Debug)]
pub enum LoadError {
    /// Nothing exists at the path.
    NotFound(PathBuf),
    /// Something exists at the path but it is not a regular file.
    NotAFile(PathBuf),
    Io(io::Error),
    /// Rejected by the CSV reader, e.g. invalid UTF-8.
    Csv(csv::Error),
    /// Structurally broken input detected while tokenizing.
    Malformed { line: u64, reason: String },
    /// The input holds no header row at all.
    NoColumns,
}

impl LoadError {
    /// True for failures caused by the file's content rather than by the
    /// filesystem.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            LoadError::Csv(_) | LoadError::Malformed { .. } | LoadError::NoColumns
        )
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound(path) => write!(f, "File not found: {}", path.display()),
            LoadError::NotAFile(path) => write!(f, "{} is not a regular file", path.display()),
            LoadError::Io(e) => write!(f, "{e}"),
            LoadError::Csv(e) => write!(f, "{e}"),
            LoadError::Malformed { line, reason } => {
                write!(f, "Error tokenizing data on line {line}: {reason}")
            }
            LoadError::NoColumns => f.write_str("No columns to parse from file"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<csv::Error> for LoadError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_classification() {
        assert!(LoadError::NoColumns.is_parse_error());
        assert!(LoadError::Malformed {
            line: 3,
            reason: "x".to_string()
        }
        .is_parse_error());
        assert!(!LoadError::NotFound(PathBuf::from("a.csv")).is_parse_error());
        assert!(!LoadError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied")).is_parse_error());
    }

    #[test]
    fn test_display_is_never_empty() {
        let errors = [
            LoadError::NotFound(PathBuf::from("data/x.csv")),
            LoadError::NotAFile(PathBuf::from("data")),
            LoadError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied")),
            LoadError::Malformed {
                line: 4,
                reason: "Expected 3 fields, saw 4".to_string(),
            },
            LoadError::NoColumns,
        ];
        for e in errors {
            assert!(!e.to_string().is_empty());
        }
    }
}
