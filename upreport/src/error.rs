use std::fmt;
use std::path::{Path, PathBuf};

/// Error types for report assembly and its collaborators
#[derive(Debug)]
pub enum ReportError {
    /// File system failure with the path that triggered it
    Io { path: PathBuf, source: std::io::Error },

    /// A project, actor or document file could not be decoded
    Parse(String),

    /// The data source could not be reached
    Connection(String),

    /// A record (process, actor, product system, sheet) does not exist
    NotFound(String),

    /// A report file extension outside the recognized set
    InvalidExtension(String),

    /// Formula text that does not parse as a symbolic expression
    Formula(String),

    /// The external document converter failed
    Conversion(String),

    /// A calculation workbook could not be read
    Workbook(String),

    /// The report was asked for output before any data was fetched
    NotFetched,
}

impl ReportError {
    /// Wrap an I/O error with the path it concerns
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion(message.into())
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            ReportError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ReportError::Connection(msg) => write!(f, "Connection error: {}", msg),
            ReportError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ReportError::InvalidExtension(ext) => {
                write!(f, "Invalid file extension: '{}'", ext)
            }
            ReportError::Formula(msg) => write!(f, "Formula error: {}", msg),
            ReportError::Conversion(msg) => write!(f, "Conversion error: {}", msg),
            ReportError::Workbook(msg) => write!(f, "Workbook error: {}", msg),
            ReportError::NotFetched => {
                write!(f, "Data has not been fetched yet. Cannot generate report.")
            }
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Parse(format!("JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for ReportError {
    fn from(err: serde_yaml::Error) -> Self {
        ReportError::Parse(format!("YAML: {}", err))
    }
}

impl From<std::fmt::Error> for ReportError {
    fn from(err: std::fmt::Error) -> Self {
        ReportError::Parse(format!("Format error: {}", err))
    }
}
