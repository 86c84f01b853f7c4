//! Durable record of completed posts
//!
//! A post URL is present if and only if its HTML artifact has been fully
//! written. The set is stored as a flat JSON list in `processed_urls.json`
//! and flushed after every append.

use crate::storage::{Storage, StorageResult};
use std::collections::HashSet;
use std::path::Path;

/// File name of the persisted set, relative to the output root
pub const PROCESSED_URLS_FILE: &str = "processed_urls.json";

/// Append-only set of post URLs whose pipeline has completed
#[derive(Debug, Default, Clone)]
pub struct ProcessedSet {
    urls: Vec<String>,
    index: HashSet<String>,
}

impl ProcessedSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the set persisted by a previous run, or an empty set
    ///
    /// # Returns
    ///
    /// * `Ok(ProcessedSet)` - Loaded (or fresh) set
    /// * `Err(StorageError)` - The file exists but is unreadable or not a JSON string list
    pub fn load(storage: &dyn Storage) -> StorageResult<Self> {
        let Some(bytes) = storage.read_file(Path::new(PROCESSED_URLS_FILE))? else {
            return Ok(Self::new());
        };

        let urls: Vec<String> = serde_json::from_slice(&bytes)?;
        let mut set = Self::new();
        for url in urls {
            set.insert(url);
        }

        tracing::info!("Loaded {} processed posts", set.len());
        Ok(set)
    }

    /// Returns true if the post has been completed
    pub fn contains(&self, url: &str) -> bool {
        self.index.contains(url)
    }

    /// Appends a completed post and flushes the set
    ///
    /// The URL is recorded in memory even if the flush fails, so the post is
    /// not dispatched again this run; the next flush persists it.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - Newly recorded and flushed
    /// * `Ok(false)` - Already present, nothing written
    /// * `Err(StorageError)` - Recorded in memory, flush failed
    pub fn record(&mut self, url: &str, storage: &dyn Storage) -> StorageResult<bool> {
        if !self.insert(url.to_string()) {
            return Ok(false);
        }
        self.flush(storage)?;
        Ok(true)
    }

    /// Writes the whole set to durable storage
    pub fn flush(&self, storage: &dyn Storage) -> StorageResult<()> {
        let json = serde_json::to_vec(&self.urls)?;
        storage.write_file(Path::new(PROCESSED_URLS_FILE), &json)
    }

    /// Number of completed posts
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Returns true if no post has been completed
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Completed post URLs in completion order
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    fn insert(&mut self, url: String) -> bool {
        if self.index.contains(&url) {
            return false;
        }
        self.index.insert(url.clone());
        self.urls.push(url);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FsStorage, StorageError};
    use tempfile::TempDir;

    fn storage() -> (TempDir, FsStorage) {
        let dir = TempDir::new().unwrap();
        let storage = FsStorage::new(dir.path()).unwrap();
        (dir, storage)
    }

    #[test]
    fn test_load_missing_file() {
        let (_dir, storage) = storage();
        let set = ProcessedSet::load(&storage).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_record_flushes_immediately() {
        let (_dir, storage) = storage();
        let mut set = ProcessedSet::new();

        assert!(set
            .record("https://blog.example.com/2020/01/a.html", &storage)
            .unwrap());

        let reloaded = ProcessedSet::load(&storage).unwrap();
        assert!(reloaded.contains("https://blog.example.com/2020/01/a.html"));
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_record_is_idempotent() {
        let (_dir, storage) = storage();
        let mut set = ProcessedSet::new();

        assert!(set.record("https://blog.example.com/a.html", &storage).unwrap());
        assert!(!set.record("https://blog.example.com/a.html", &storage).unwrap());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_persisted_format_is_flat_list() {
        let (_dir, storage) = storage();
        let mut set = ProcessedSet::new();
        set.record("https://blog.example.com/a.html", &storage).unwrap();
        set.record("https://blog.example.com/b.html", &storage).unwrap();

        let raw = std::fs::read_to_string(storage.root().join(PROCESSED_URLS_FILE)).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            parsed,
            vec![
                "https://blog.example.com/a.html".to_string(),
                "https://blog.example.com/b.html".to_string()
            ]
        );
    }

    #[test]
    fn test_load_deduplicates() {
        let (_dir, storage) = storage();
        storage
            .write_file(
                Path::new(PROCESSED_URLS_FILE),
                br#"["https://a/x.html", "https://a/x.html", "https://a/y.html"]"#,
            )
            .unwrap();

        let set = ProcessedSet::load(&storage).unwrap();
        assert_eq!(set.urls(), &["https://a/x.html", "https://a/y.html"]);
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let (_dir, storage) = storage();
        storage
            .write_file(Path::new(PROCESSED_URLS_FILE), b"{not json")
            .unwrap();

        assert!(matches!(
            ProcessedSet::load(&storage),
            Err(StorageError::Serialization(_))
        ));
    }
}
