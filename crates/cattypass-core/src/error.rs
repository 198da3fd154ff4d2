//! Error types for vault operations.

use thiserror::Error;

/// Errors surfaced at the boundary of every vault operation.
#[derive(Debug, Error)]
pub enum VaultError {
    /// A required field was missing or blank.
    #[error("{0}")]
    Validation(String),

    /// The storage area could not be read or written.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Import input could not be read as text.
    #[error("Failed to parse import: {0}")]
    Parse(String),

    /// There was nothing to export.
    #[error("{0}")]
    Export(String),

    /// The download collaborator could not save the export.
    #[error("Download failed: {0}")]
    DownloadFailed(String),
}

impl VaultError {
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VaultError>;
