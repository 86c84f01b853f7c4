//! Storage module for persisting mirrored artifacts
//!
//! This module handles all filesystem operations for the mirror, including:
//! - Rooting every artifact under the blog's output directory
//! - Atomic file replacement (temp file + rename)
//! - Rejecting paths that would escape the output root

mod traits;

pub use traits::{Storage, StorageError, StorageResult};

use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

/// Filesystem storage rooted at a mirror's output directory
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Opens storage at `root`, creating the directory if needed
    ///
    /// # Returns
    ///
    /// * `Ok(FsStorage)` - The root directory exists
    /// * `Err(StorageError)` - The root could not be created
    pub fn new(root: &Path) -> StorageResult<Self> {
        std::fs::create_dir_all(root).map_err(|e| StorageError::io(root, e))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// The output root all relative paths resolve against
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a relative path against the root
    fn resolve(&self, path: &Path) -> StorageResult<PathBuf> {
        let escapes = path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

        if escapes || path.as_os_str().is_empty() {
            return Err(StorageError::InvalidPath(path.to_path_buf()));
        }

        Ok(self.root.join(path))
    }
}

impl Storage for FsStorage {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).map(|p| p.is_file()).unwrap_or(false)
    }

    fn make_dirs(&self, path: &Path) -> StorageResult<()> {
        let full = self.resolve(path)?;
        std::fs::create_dir_all(&full).map_err(|e| StorageError::io(&full, e))
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> StorageResult<()> {
        let full = self.resolve(path)?;
        let parent = full
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        std::fs::create_dir_all(&parent).map_err(|e| StorageError::io(&parent, e))?;

        // Same directory as the target so the rename stays on one filesystem
        let mut tmp = NamedTempFile::new_in(&parent).map_err(|e| StorageError::io(&parent, e))?;
        tmp.write_all(bytes).map_err(|e| StorageError::io(&full, e))?;
        tmp.flush().map_err(|e| StorageError::io(&full, e))?;
        tmp.persist(&full)
            .map_err(|e| StorageError::io(&full, e.error))?;

        Ok(())
    }

    fn read_file(&self, path: &Path) -> StorageResult<Option<Vec<u8>>> {
        let full = self.resolve(path)?;
        match std::fs::read(&full) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(&full, e)),
        }
    }
}
