use std::path::PathBuf;
use thiserror::Error;

/// Result type for batch operations
pub type Result<T> = std::result::Result<T, BatchError>;

/// Errors that can occur while driving a batch run.
///
/// Only configuration problems surface as run failures; per-file and
/// per-line conditions are absorbed into the audit log so one bad file
/// cannot void hours of otherwise-good work.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not a directory: {0}")]
    InvalidRoot(PathBuf),
}
