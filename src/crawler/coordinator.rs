//! Crawler coordinator - main mirroring loop
//!
//! This module drives the listing-page frontier:
//! - Initializing the output root, processed set and frontier
//! - Fetching listing pages in FIFO order (same host only)
//! - Saving the landing page once per run
//! - Dispatching newly found posts to the post pipeline
//! - Enqueuing listing, archive and pager links

use crate::config::Config;
use crate::crawler::{
    Fetcher, HttpFetcher, Outcome, PageParser, Politeness, PostProcessor, SkipReason,
};
use crate::state::{Frontier, PageState, ProcessedSet};
use crate::storage::{FsStorage, Storage};
use crate::url::{BlogTarget, IMAGES_DIR};
use crate::MirrorError;
use std::path::Path;
use std::time::Instant;
use url::Url;

/// File name of the saved landing page, relative to the output root
pub const LANDING_PAGE_FILE: &str = "index.html";

/// Counters for one mirroring run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub pages_visited: usize,
    pub pages_failed: usize,
    pub pages_discarded: usize,
    pub posts_stored: usize,
    pub posts_skipped: usize,
    pub posts_failed: usize,
    pub images_downloaded: usize,
    pub images_rewritten: usize,
}

/// Links a visited listing page contributed to the crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PageSummary {
    posts_found: usize,
    pages_enqueued: usize,
}

/// Main mirror coordinator structure
pub struct Coordinator {
    config: Config,
    target: BlogTarget,
    fetcher: Box<dyn Fetcher>,
    storage: Box<dyn Storage>,
    parser: PageParser,
    politeness: Politeness,
    processed: ProcessedSet,
    frontier: Frontier,
    landing_saved: bool,
    stats: CrawlStats,
}

impl Coordinator {
    /// Creates a coordinator writing to `<output.directory>/<blog host>`
    ///
    /// # Arguments
    ///
    /// * `config` - The mirror configuration
    /// * `root_url` - The blog's root URL
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(MirrorError)` - Invalid URL, unwritable output root, or unreadable processed list
    pub fn new(config: Config, root_url: &str) -> Result<Self, MirrorError> {
        let target = BlogTarget::new(root_url, Path::new(&config.output.directory))?;
        let storage = FsStorage::new(target.output_root())?;
        let fetcher = HttpFetcher::new(&config.http)?;

        tracing::info!("Mirroring {} into {}", target.base(), target.output_root().display());
        Self::with_collaborators(config, target, Box::new(fetcher), Box::new(storage))
    }

    /// Creates a coordinator over explicit fetch and storage collaborators
    pub fn with_collaborators(
        config: Config,
        target: BlogTarget,
        fetcher: Box<dyn Fetcher>,
        storage: Box<dyn Storage>,
    ) -> Result<Self, MirrorError> {
        storage.make_dirs(Path::new(IMAGES_DIR))?;
        let processed = ProcessedSet::load(storage.as_ref())?;
        let parser = PageParser::new(&config.crawler)?;
        let politeness = Politeness::from_config(&config.crawler);
        let frontier = Frontier::seeded(target.root().clone());

        Ok(Self {
            config,
            target,
            fetcher,
            storage,
            parser,
            politeness,
            processed,
            frontier,
            landing_saved: false,
            stats: CrawlStats::default(),
        })
    }

    /// Runs the crawl until the frontier is empty
    ///
    /// Per-page and per-post failures are logged and counted; they never
    /// stop the crawl.
    pub async fn run(&mut self) -> CrawlStats {
        tracing::info!("Starting crawl of {}", self.target.base());
        let start_time = Instant::now();
        let mut pages_handled = 0usize;

        while let Some(url) = self.frontier.pop() {
            match self.visit(&url).await {
                Outcome::Success(summary) => {
                    tracing::debug!(
                        "Page {} done: {} posts found, {} pages queued",
                        url,
                        summary.posts_found,
                        summary.pages_enqueued
                    );
                }
                Outcome::Skipped(reason) => {
                    tracing::debug!("Discarded {} ({:?})", url, reason);
                }
                Outcome::Failed(e) => {
                    tracing::warn!("Error fetching page {}: {}", url, e);
                }
            }

            pages_handled += 1;
            if pages_handled % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages handled, {} in queue, {} posts stored, {:.1}s elapsed",
                    pages_handled,
                    self.frontier.queued_len(),
                    self.processed.len(),
                    start_time.elapsed().as_secs_f64()
                );
            }
        }

        tracing::debug!(
            "Frontier drained: {} pages {}, {} pages {}",
            self.frontier.count(PageState::Visited),
            PageState::Visited,
            self.frontier.count(PageState::Discarded),
            PageState::Discarded
        );
        tracing::info!(
            "Crawl complete: {} pages, {} posts stored ({} already mirrored), {} images in {:.1}s",
            self.stats.pages_visited,
            self.stats.posts_stored,
            self.stats.posts_skipped,
            self.stats.images_downloaded,
            start_time.elapsed().as_secs_f64()
        );
        if self.stats.pages_failed > 0 || self.stats.posts_failed > 0 {
            tracing::warn!(
                "{} pages and {} posts failed; rerun to retry them",
                self.stats.pages_failed,
                self.stats.posts_failed
            );
        }

        self.stats
    }

    /// Handles one listing page popped from the frontier
    async fn visit(&mut self, url: &Url) -> Outcome<PageSummary> {
        if !self.target.is_same_domain(url) {
            self.frontier.mark(url, PageState::Discarded);
            self.stats.pages_discarded += 1;
            return Outcome::Skipped(SkipReason::OutOfDomain);
        }

        self.frontier.mark(url, PageState::Visited);
        tracing::info!("Visiting: {}", url);

        self.politeness.pause().await;
        let body = match self.fetcher.fetch(url.as_str()).await.into_body(url.as_str()) {
            Ok(body) => body,
            Err(e) => {
                self.stats.pages_failed += 1;
                return Outcome::Failed(e);
            }
        };
        self.stats.pages_visited += 1;

        if !self.landing_saved && self.target.is_root(url) {
            self.save_landing_page(&body);
        }

        let html = String::from_utf8_lossy(&body);
        let links = self.parser.parse_listing(&html, url, self.target.base());
        let mut summary = PageSummary {
            posts_found: links.posts.len(),
            pages_enqueued: 0,
        };

        let posts = PostProcessor::new(
            &self.config.images,
            self.fetcher.as_ref(),
            self.storage.as_ref(),
            self.politeness,
        );

        for post_url in &links.posts {
            tracing::info!("Found post: {}", post_url);
            match posts.process(post_url, &mut self.processed).await {
                Outcome::Success(stored) => {
                    self.stats.posts_stored += 1;
                    self.stats.images_downloaded += stored.images_downloaded;
                    self.stats.images_rewritten += stored.images_rewritten;
                }
                Outcome::Skipped(_) => self.stats.posts_skipped += 1,
                Outcome::Failed(_) => self.stats.posts_failed += 1,
            }
        }

        for page_url in links.pages {
            if self.processed.contains(page_url.as_str()) {
                continue;
            }
            let page_str = page_url.to_string();
            if self.frontier.enqueue(page_url) {
                tracing::debug!("Added to queue: {}", page_str);
                summary.pages_enqueued += 1;
            }
        }

        if let Err(e) = self.processed.flush(self.storage.as_ref()) {
            tracing::warn!("Failed to persist processed list: {}", e);
        }

        Outcome::Success(summary)
    }

    fn save_landing_page(&mut self, body: &[u8]) {
        match self.storage.write_file(Path::new(LANDING_PAGE_FILE), body) {
            Ok(()) => {
                self.landing_saved = true;
                tracing::info!("Saved landing page to {}", LANDING_PAGE_FILE);
            }
            Err(e) => tracing::warn!("Error saving landing page: {}", e),
        }
    }

    /// The blog being mirrored
    pub fn target(&self) -> &BlogTarget {
        &self.target
    }

    /// Posts completed by this and earlier runs
    pub fn processed(&self) -> &ProcessedSet {
        &self.processed
    }

    /// Listing pages seen this run
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Counters accumulated so far
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }
}
