//! Crawler module for mirroring a blog
//!
//! This module contains the mirroring pipeline, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - Politeness pacing before every request
//! - HTML link extraction and image rewriting
//! - Image caching (`ImageFetcher`) and post persistence (`PostProcessor`)
//! - Overall crawl coordination over the listing-page frontier

mod coordinator;
mod fetcher;
mod images;
mod parser;
mod politeness;
mod post;

pub use coordinator::{CrawlStats, Coordinator, LANDING_PAGE_FILE};
pub use fetcher::{build_http_client, fetch_url, FetchResult, Fetcher, HttpFetcher};
pub use images::{CachedImage, ImageFetcher};
pub use parser::{
    extract_image_sources, resolve_link, rewrite_image_sources, ListingLinks, PageParser,
};
pub use politeness::Politeness;
pub use post::{PostProcessor, StoredPost};

use crate::config::Config;
use crate::MirrorError;

/// Result of a per-item pipeline step
///
/// Per-item failures never propagate into the crawl loop; they are reported
/// through this type so the skip/retry policy stays explicit.
#[derive(Debug)]
pub enum Outcome<T> {
    /// The step completed and produced a value
    Success(T),

    /// The step was intentionally not performed
    Skipped(SkipReason),

    /// The step failed; the item stays eligible for a later run
    Failed(MirrorError),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns the produced value, if any
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }
}

/// Why a pipeline step was not performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The post is already recorded in the processed set
    AlreadyProcessed,

    /// The image URL matches the denylist
    Denylisted,

    /// The resource is not an HTTP(S) URL (e.g. a data: URI)
    NotHttp,

    /// The page belongs to another host
    OutOfDomain,
}

/// Runs a complete mirroring operation
///
/// This is the main entry point for mirroring a blog. It will:
/// 1. Derive the output root from the blog URL
/// 2. Load the processed set left by earlier runs
/// 3. Crawl listing pages from the root, storing every new post
/// 4. Persist progress after every post and every page
///
/// # Arguments
///
/// * `config` - The mirror configuration
/// * `root_url` - The blog's root URL
///
/// # Returns
///
/// * `Ok(CrawlStats)` - The frontier drained (per-item failures are counted, not fatal)
/// * `Err(MirrorError)` - Startup failed (bad URL, unreadable state, unwritable output)
pub async fn mirror(config: Config, root_url: &str) -> Result<CrawlStats, MirrorError> {
    let mut coordinator = Coordinator::new(config, root_url)?;
    Ok(coordinator.run().await)
}
