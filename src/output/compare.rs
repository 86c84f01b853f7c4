//! Comparison of processed posts against an expected URL list
//!
//! `expected.json` and `processed_urls.json` are both flat JSON string lists
//! living in the mirror directory.

use crate::state::PROCESSED_URLS_FILE;
use crate::MirrorError;
use std::collections::BTreeSet;
use std::path::Path;

/// File holding the list of post URLs a complete mirror should contain
pub const EXPECTED_URLS_FILE: &str = "expected.json";

/// Difference between expected and processed post URLs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlComparison {
    /// Expected but not processed, sorted
    pub missing: Vec<String>,

    /// Processed but not expected, sorted
    pub extra: Vec<String>,

    /// Distinct expected URLs
    pub expected_count: usize,

    /// Distinct processed URLs
    pub processed_count: usize,
}

impl UrlComparison {
    /// Returns true if every expected URL has been processed
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Compares `expected.json` with `processed_urls.json` in `base_dir`
///
/// # Returns
///
/// * `Ok(Some(UrlComparison))` - Both lists loaded
/// * `Ok(None)` - No processed list exists yet
/// * `Err(MirrorError)` - The expected list is missing, or either file is not a JSON string list
pub fn compare_urls(base_dir: &Path) -> Result<Option<UrlComparison>, MirrorError> {
    let expected = load_url_list(&base_dir.join(EXPECTED_URLS_FILE))?;

    let processed_path = base_dir.join(PROCESSED_URLS_FILE);
    if !processed_path.exists() {
        return Ok(None);
    }
    let processed = load_url_list(&processed_path)?;

    Ok(Some(UrlComparison {
        missing: expected.difference(&processed).cloned().collect(),
        extra: processed.difference(&expected).cloned().collect(),
        expected_count: expected.len(),
        processed_count: processed.len(),
    }))
}

fn load_url_list(path: &Path) -> Result<BTreeSet<String>, MirrorError> {
    let bytes = std::fs::read(path)?;
    let urls: Vec<String> = serde_json::from_slice(&bytes)?;
    Ok(urls.into_iter().collect())
}

/// Prints a comparison to stdout
///
/// Extra URLs are only listed once nothing is missing.
pub fn print_comparison(comparison: Option<&UrlComparison>) {
    let Some(comparison) = comparison else {
        println!("{} not found!", PROCESSED_URLS_FILE);
        return;
    };

    if comparison.is_complete() {
        println!("\nAll expected URLs have been processed!");
        if !comparison.extra.is_empty() {
            println!("\nFound {} extra URLs:", comparison.extra.len());
            for url in &comparison.extra {
                println!("{}", url);
            }
        }
    } else {
        println!("\nFound {} missing URLs:", comparison.missing.len());
        for url in &comparison.missing {
            println!("{}", url);
        }
    }

    println!("\nStatistics:");
    println!("Expected URLs: {}", comparison.expected_count);
    println!("Processed URLs: {}", comparison.processed_count);
    println!("Missing URLs: {}", comparison.missing.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_list(dir: &Path, name: &str, urls: &[&str]) {
        fs::write(dir.join(name), serde_json::to_vec(urls).unwrap()).unwrap();
    }

    #[test]
    fn test_reports_missing_urls() {
        let dir = TempDir::new().unwrap();
        write_list(
            dir.path(),
            EXPECTED_URLS_FILE,
            &["https://b.example/2", "https://b.example/1", "https://b.example/3"],
        );
        write_list(
            dir.path(),
            PROCESSED_URLS_FILE,
            &["https://b.example/1", "https://b.example/9"],
        );

        let comparison = compare_urls(dir.path()).unwrap().unwrap();

        assert!(!comparison.is_complete());
        assert_eq!(comparison.missing, vec!["https://b.example/2", "https://b.example/3"]);
        assert_eq!(comparison.extra, vec!["https://b.example/9"]);
        assert_eq!(comparison.expected_count, 3);
        assert_eq!(comparison.processed_count, 2);
    }

    #[test]
    fn test_complete_mirror() {
        let dir = TempDir::new().unwrap();
        write_list(dir.path(), EXPECTED_URLS_FILE, &["https://b.example/1"]);
        write_list(
            dir.path(),
            PROCESSED_URLS_FILE,
            &["https://b.example/1", "https://b.example/1"],
        );

        let comparison = compare_urls(dir.path()).unwrap().unwrap();
        assert!(comparison.is_complete());
        assert!(comparison.extra.is_empty());
        assert_eq!(comparison.processed_count, 1);
    }

    #[test]
    fn test_missing_processed_file() {
        let dir = TempDir::new().unwrap();
        write_list(dir.path(), EXPECTED_URLS_FILE, &["https://b.example/1"]);
        assert_eq!(compare_urls(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_missing_expected_file_is_error() {
        let dir = TempDir::new().unwrap();
        write_list(dir.path(), PROCESSED_URLS_FILE, &["https://b.example/1"]);
        assert!(matches!(compare_urls(dir.path()), Err(MirrorError::Io(_))));
    }

    #[test]
    fn test_malformed_list_is_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(EXPECTED_URLS_FILE), b"{\"not\": \"a list\"}").unwrap();
        write_list(dir.path(), PROCESSED_URLS_FILE, &[]);
        assert!(matches!(compare_urls(dir.path()), Err(MirrorError::Json(_))));
    }
}
