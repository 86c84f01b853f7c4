//! Storage traits and error types
//!
//! This module defines the filesystem collaborator used by the mirroring
//! pipeline. All paths are relative to the blog's output root.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Path escapes the output root: {0}")]
    InvalidPath(PathBuf),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for the mirror's file storage
///
/// Implementations must make `write_file` all-or-nothing: a reader never
/// observes a partially written file at the target path.
pub trait Storage: Send + Sync {
    /// Returns true if a file exists at the relative path
    fn exists(&self, path: &Path) -> bool;

    /// Creates the directory (and parents) at the relative path
    fn make_dirs(&self, path: &Path) -> StorageResult<()>;

    /// Writes the file, creating parent directories as needed
    fn write_file(&self, path: &Path, bytes: &[u8]) -> StorageResult<()>;

    /// Reads the file, or `None` if it does not exist
    fn read_file(&self, path: &Path) -> StorageResult<Option<Vec<u8>>>;
}
