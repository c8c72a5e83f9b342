//! Typed error handling for classpack.
//!
//! Provides structured errors that library consumers can match on,
//! with context about what went wrong and where. Ordinary data oddities
//! (unresolvable classes, claim conflicts, malformed attribute spans) are
//! never errors; they degrade to skipped work.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for classpack operations.
///
/// This provides typed errors that library consumers can match on,
/// unlike opaque `anyhow::Error` types.
#[derive(Error, Debug)]
pub enum ClasspackError {
    /// I/O error when reading/writing files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Malformed external analyzer report
    #[error("Report error: {message}")]
    Report { message: String },

    /// Rewrite operation errors
    #[error("Rewrite error: {message}")]
    Rewrite { message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ClasspackError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a report error.
    pub fn report(message: impl Into<String>) -> Self {
        Self::Report {
            message: message.into(),
        }
    }

    /// Create a rewrite error.
    pub fn rewrite(message: impl Into<String>) -> Self {
        Self::Rewrite {
            message: message.into(),
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error (can continue optimization).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::Report { .. } | Self::Rewrite { .. }
        )
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for classpack results.
pub type ClasspackResult<T> = Result<T, ClasspackError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> ClasspackResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> ClasspackResult<T> {
        self.map_err(|e| ClasspackError::io(path, e))
    }
}
