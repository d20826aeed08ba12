use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a synchronization run
#[derive(Debug, Error)]
pub enum SyncError {
    /// An input file could not be opened for reading
    #[error("Cannot open {} for reading: {source}", path.display())]
    MissingFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A `loc("...")` literal does not fit the scratch buffer
    #[error("String too long at byte {offset}: {len} bytes (limit is {max})")]
    OversizedLiteral { offset: usize, len: usize, max: usize },

    /// A marker was opened but no unescaped closing quote follows it
    #[error("Unterminated string starting at byte {offset}")]
    UnterminatedLiteral { offset: usize },

    /// The language file could not be appended to or rewritten
    #[error("Cannot write {}: {source}", path.display())]
    UnwritableOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is unreadable or invalid
    #[error("Invalid config file {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl SyncError {
    pub fn missing_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::MissingFile {
            path: path.into(),
            source,
        }
    }

    pub fn unwritable_output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::UnwritableOutput {
            path: path.into(),
            source,
        }
    }

    pub fn config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for SyncError
pub type Result<T> = std::result::Result<T, SyncError>;
