//! Post pipeline
//!
//! Fetches one post, localizes its images, rewrites the `<img src>` values and
//! stores the result under the output root. The post URL is recorded in the
//! processed set only after its HTML artifact is on disk.

use crate::config::ImageConfig;
use crate::crawler::{
    extract_image_sources, resolve_link, rewrite_image_sources, Fetcher, ImageFetcher, Outcome,
    Politeness, SkipReason,
};
use crate::state::ProcessedSet;
use crate::storage::Storage;
use crate::url::post_file_path;
use crate::MirrorError;
use std::collections::HashMap;
use std::path::PathBuf;
use url::Url;

/// A post whose HTML artifact has been written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPost {
    /// Artifact path relative to the output root
    pub path: PathBuf,

    /// Number of `<img src>` attributes rewritten to local references
    pub images_rewritten: usize,

    /// Number of images downloaded while processing this post
    pub images_downloaded: usize,
}

/// Runs the fetch, localize, rewrite and store steps for single posts
pub struct PostProcessor<'a> {
    images: ImageFetcher<'a>,
    fetcher: &'a dyn Fetcher,
    storage: &'a dyn Storage,
    politeness: Politeness,
}

impl<'a> PostProcessor<'a> {
    pub fn new(
        image_config: &'a ImageConfig,
        fetcher: &'a dyn Fetcher,
        storage: &'a dyn Storage,
        politeness: Politeness,
    ) -> Self {
        Self {
            images: ImageFetcher::new(image_config, fetcher, storage, politeness),
            fetcher,
            storage,
            politeness,
        }
    }

    /// Processes a post unless it was completed by this or an earlier run
    ///
    /// A failed fetch or write leaves the processed set untouched, so the
    /// post is retried on the next run. A failed flush after a successful
    /// write is logged and the post still counts as stored.
    pub async fn process(
        &self,
        post_url: &Url,
        processed: &mut ProcessedSet,
    ) -> Outcome<StoredPost> {
        let key = post_url.as_str();
        if processed.contains(key) {
            tracing::debug!("Skipping already processed post: {}", key);
            return Outcome::Skipped(SkipReason::AlreadyProcessed);
        }

        let path = match post_file_path(post_url) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Cannot derive a file path for {}: {}", key, e);
                return Outcome::Failed(e.into());
            }
        };

        self.politeness.pause().await;
        let body = match self.fetcher.fetch(key).await.into_body(key) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Error processing post {}: {}", key, e);
                return Outcome::Failed(e);
            }
        };

        let sources = extract_image_sources(&String::from_utf8_lossy(&body));
        let mut replacements = HashMap::new();
        let mut images_downloaded = 0;

        for src in sources {
            if self.images.is_denylisted(&src) {
                tracing::debug!("Leaving denylisted image {} in {}", src, key);
                continue;
            }

            let Some(image_url) = resolve_link(&src, post_url) else {
                tracing::debug!("Ignoring unresolvable image source {:?} in {}", src, key);
                continue;
            };

            if let Outcome::Success(image) = self.images.fetch_image(image_url.as_str()).await {
                if image.downloaded {
                    images_downloaded += 1;
                }
                if image.reference != src {
                    replacements.insert(src, image.reference);
                }
            }
        }

        let (html, images_rewritten) = match rewrite_image_sources(&body, &replacements) {
            Ok(rewritten) => rewritten,
            Err(message) => {
                tracing::warn!("Error rewriting post {}: {}", key, message);
                return Outcome::Failed(MirrorError::HtmlRewrite {
                    url: key.to_string(),
                    message,
                });
            }
        };

        if let Err(e) = self.storage.write_file(&path, &html) {
            tracing::warn!("Error saving post {} to {}: {}", key, path.display(), e);
            return Outcome::Failed(e.into());
        }

        if let Err(e) = processed.record(key, self.storage) {
            tracing::warn!("Recorded {} but could not persist the processed list: {}", key, e);
        }

        tracing::info!("Saved post: {} -> {}", key, path.display());
        Outcome::Success(StoredPost {
            path,
            images_rewritten,
            images_downloaded,
        })
    }
}
