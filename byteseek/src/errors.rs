use std::path::PathBuf;
use thiserror::Error;

use crate::search::matcher::MAX_NEEDLE_LEN;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Target is not a searchable file or directory: {0}")]
    TargetNotSearchable(PathBuf),
    #[error("Empty search pattern")]
    EmptyPattern,
    #[error("Pattern is {len} bytes, longer than the maximum of {MAX_NEEDLE_LEN}")]
    PatternTooLong { len: usize },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SearchError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn target_not_searchable(path: impl Into<PathBuf>) -> Self {
        Self::TargetNotSearchable(path.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn thread_pool_error(msg: impl Into<String>) -> Self {
        Self::ThreadPoolError(msg.into())
    }

    /// Maps an open/stat failure to the matching error variant, keeping the
    /// offending path in the message.
    pub(crate) fn from_io(e: std::io::Error, path: &std::path::Path) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(e),
        }
    }
}
