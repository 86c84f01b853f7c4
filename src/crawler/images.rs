//! Local image cache
//!
//! Ensures a remote image has a local copy under `images/` and returns the
//! reference to substitute into rewritten HTML. A copy that already exists is
//! never downloaded again, which makes repeated runs and images shared
//! between posts free.

use crate::config::ImageConfig;
use crate::crawler::{Fetcher, Outcome, Politeness, SkipReason};
use crate::url::{matches_denylist, PathDeriver};
use crate::MirrorError;
use crate::storage::Storage;
use std::path::PathBuf;
use url::Url;

/// A locally available image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedImage {
    /// Site-absolute reference, e.g. `/images/a/b/photo.jpg`
    pub reference: String,

    /// Path relative to the output root
    pub path: PathBuf,

    /// True if this call downloaded the image, false if it was already cached
    pub downloaded: bool,
}

/// Downloads images into the mirror's image cache
pub struct ImageFetcher<'a> {
    denylist: &'a [String],
    deriver: PathDeriver,
    fetcher: &'a dyn Fetcher,
    storage: &'a dyn Storage,
    politeness: Politeness,
}

impl<'a> ImageFetcher<'a> {
    pub fn new(
        config: &'a ImageConfig,
        fetcher: &'a dyn Fetcher,
        storage: &'a dyn Storage,
        politeness: Politeness,
    ) -> Self {
        Self {
            denylist: &config.denylist,
            deriver: PathDeriver::new(config),
            fetcher,
            storage,
            politeness,
        }
    }

    /// Returns true if the image is referenced but never fetched
    pub fn is_denylisted(&self, image_url: &str) -> bool {
        matches_denylist(self.denylist, image_url)
    }

    /// Ensures a local copy exists and returns the reference to use in HTML
    ///
    /// Denylisted, non-HTTP and failed images yield the original URL
    /// unchanged so the caller can still produce valid output.
    pub async fn ensure_local(&self, image_url: &str) -> String {
        match self.fetch_image(image_url).await {
            Outcome::Success(image) => image.reference,
            Outcome::Skipped(_) | Outcome::Failed(_) => image_url.to_string(),
        }
    }

    /// Ensures a local copy exists, reporting what happened
    pub async fn fetch_image(&self, image_url: &str) -> Outcome<CachedImage> {
        if self.is_denylisted(image_url) {
            tracing::debug!("Skipping denylisted image {}", image_url);
            return Outcome::Skipped(SkipReason::Denylisted);
        }

        match Url::parse(image_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            _ => {
                tracing::debug!("Skipping non-HTTP image source {}", image_url);
                return Outcome::Skipped(SkipReason::NotHttp);
            }
        }

        let derived = self.deriver.derive(image_url);
        let path = derived.local_path();

        if self.storage.exists(&path) {
            tracing::debug!("Image already exists: {}", path.display());
            return Outcome::Success(CachedImage {
                reference: derived.reference(),
                path,
                downloaded: false,
            });
        }

        self.politeness.pause().await;
        let body = match self.fetcher.fetch(image_url).await.into_body(image_url) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Error downloading image {}: {}", image_url, e);
                return Outcome::Failed(e);
            }
        };

        if let Err(e) = self.storage.write_file(&path, &body) {
            tracing::warn!("Error saving image {} to {}: {}", image_url, path.display(), e);
            return Outcome::Failed(MirrorError::Storage(e));
        }

        tracing::debug!("Saved image {} -> {}", image_url, path.display());
        Outcome::Success(CachedImage {
            reference: derived.reference(),
            path,
            downloaded: true,
        })
    }
}
