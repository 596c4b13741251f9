// LogcatLens - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every variant keeps its cause so the
// caller can log the full chain once and decide presentation.
//
// A line that does not match a converter's grammar is NOT an error and has
// no variant here: it is simply excluded from the record set.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LogcatLens operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LogcatLensError {
    /// Format detection found no usable converter.
    Detect(DetectError),

    /// Reading or writing a log file failed.
    File(FileError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for LogcatLensError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detect(e) => write!(f, "Detection error: {e}"),
            Self::File(e) => write!(f, "File error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for LogcatLensError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Detect(e) => Some(e),
            Self::File(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Detection errors
// ---------------------------------------------------------------------------

/// Errors raised while auto-detecting the format of a line source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectError {
    /// Every candidate converter parsed zero lines.
    NoMatchingFormat {
        /// Non-blank, non-header lines seen in the source.
        line_count: usize,
        /// Number of candidates that were tried.
        candidates: usize,
    },
}

impl fmt::Display for DetectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatchingFormat {
                line_count,
                candidates,
            } => write!(
                f,
                "No converter could parse the source ({line_count} lines, \
                 {candidates} formats tried)"
            ),
        }
    }
}

impl std::error::Error for DetectError {}

impl From<DetectError> for LogcatLensError {
    fn from(e: DetectError) -> Self {
        Self::Detect(e)
    }
}

// ---------------------------------------------------------------------------
// File errors
// ---------------------------------------------------------------------------

/// Errors related to loading and saving log files.
#[derive(Debug)]
pub enum FileError {
    /// The path does not exist.
    NotFound { path: PathBuf },

    /// The path exists but is not a regular file.
    NotAFile { path: PathBuf },

    /// The file could not be opened or read.
    Read { path: PathBuf, source: io::Error },

    /// The file (or its temporary sibling) could not be written or renamed.
    Write { path: PathBuf, source: io::Error },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => {
                write!(f, "File does not exist: '{}'", path.display())
            }
            Self::NotAFile { path } => {
                write!(f, "Path is not a file: '{}'", path.display())
            }
            Self::Read { path, source } => {
                write!(f, "Failed to read '{}': {source}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "Failed to write '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<FileError> for LogcatLensError {
    fn from(e: FileError) -> Self {
        Self::File(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range or not recognised.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for LogcatLensError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
