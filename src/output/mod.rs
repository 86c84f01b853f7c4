//! Output module for offline reports over a mirror directory
//!
//! This module handles:
//! - Counting stored HTML files per directory
//! - Comparing processed post URLs with an expected list

mod compare;
pub mod stats;

pub use compare::{compare_urls, print_comparison, UrlComparison, EXPECTED_URLS_FILE};
pub use stats::{count_html_files, print_html_counts, HtmlCounts, ROOT_LABEL};
