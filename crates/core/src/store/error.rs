//! Error types for the store module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur writing output artifacts.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to create an output directory.
    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an artifact file.
    #[error("Failed to write file: {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
