//! HTML file counts for a mirror directory
//!
//! Walks a mirror (skipping the image cache) and tallies `.html` files per
//! directory, a quick check that a crawl stored what was expected.

use crate::url::IMAGES_DIR;
use crate::MirrorError;
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

/// Label used for files directly under the mirror root
pub const ROOT_LABEL: &str = "root";

/// Number of HTML files per directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlCounts {
    /// Directory (relative, `/`-separated, or `root`) to file count
    pub by_dir: BTreeMap<String, usize>,

    /// Total HTML files found
    pub total: usize,
}

/// Counts `.html` files under `base_dir`, ignoring the `images/` subtree
///
/// # Returns
///
/// * `Ok(HtmlCounts)` - Counts per directory (directories without HTML are omitted)
/// * `Err(MirrorError)` - The directory is missing or unreadable
pub fn count_html_files(base_dir: &Path) -> Result<HtmlCounts, MirrorError> {
    if !base_dir.is_dir() {
        return Err(MirrorError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Directory {} does not exist", base_dir.display()),
        )));
    }

    let mut counts = HtmlCounts::default();
    let walker = WalkDir::new(base_dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !(entry.depth() == 1 && entry.file_name() == IMAGES_DIR));

    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) != Some("html") {
            continue;
        }

        let dir = entry
            .path()
            .parent()
            .and_then(|parent| parent.strip_prefix(base_dir).ok())
            .map(directory_label)
            .unwrap_or_else(|| ROOT_LABEL.to_string());

        *counts.by_dir.entry(dir).or_insert(0) += 1;
        counts.total += 1;
    }

    Ok(counts)
}

fn directory_label(relative: &Path) -> String {
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if parts.is_empty() {
        ROOT_LABEL.to_string()
    } else {
        parts.join("/")
    }
}

/// Prints HTML counts to stdout in a formatted manner
pub fn print_html_counts(base_dir: &Path, counts: &HtmlCounts) {
    println!("\nHTML File Count by Directory in {}:", base_dir.display());
    println!("{}", "-".repeat(50));
    for (dir, count) in &counts.by_dir {
        println!("{}: {} files", dir, count);
    }
    println!("{}", "-".repeat(50));
    println!("Total HTML files: {}", counts.total);
}
