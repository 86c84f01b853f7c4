//! URL handling module for Blog-Mirror
//!
//! This module provides the blog target identity, host extraction, wildcard
//! and denylist matching, and local path derivation for images and posts.

mod domain;
mod image_path;
mod matcher;

use crate::{UrlError, UrlResult};
use std::path::{Path, PathBuf};
use url::Url;

// Re-export main functions
pub use domain::{extract_host, extract_netloc};
pub use image_path::{is_optimization_segment, ImagePath, PathDeriver, IMAGES_DIR};
pub use matcher::{matches_denylist, matches_wildcard};

/// The blog being mirrored
///
/// Created once at startup and immutable for the run. The output root is
/// `<output_dir>/<netloc>`.
#[derive(Debug, Clone)]
pub struct BlogTarget {
    root: Url,
    base: String,
    domain: String,
    output_root: PathBuf,
}

impl BlogTarget {
    /// Creates a target from the blog's root URL
    ///
    /// # Examples
    ///
    /// ```
    /// use blog_mirror::url::BlogTarget;
    /// use std::path::Path;
    ///
    /// let target =
    ///     BlogTarget::new("https://example.blogspot.com/", Path::new("mirrors")).unwrap();
    /// assert_eq!(target.domain(), "example.blogspot.com");
    /// assert_eq!(target.base(), "https://example.blogspot.com");
    /// assert_eq!(target.output_root(), Path::new("mirrors/example.blogspot.com"));
    /// ```
    pub fn new(root_url: &str, output_dir: &Path) -> UrlResult<Self> {
        let trimmed = root_url.trim();
        let root = Url::parse(trimmed).map_err(|e| UrlError::Parse(e.to_string()))?;

        if root.scheme() != "http" && root.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                root.scheme()
            )));
        }

        let domain = extract_netloc(&root).ok_or(UrlError::MissingHost)?;
        let output_root = output_dir.join(&domain);

        Ok(Self {
            base: root.as_str().trim_end_matches('/').to_string(),
            root,
            domain,
            output_root,
        })
    }

    /// The parsed root URL (the crawl seed)
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// The root URL as given, without trailing slashes
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Network location (host and explicit port) of the blog
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Directory all artifacts of this blog are written under
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Returns true if the URL is served from the blog's own host
    pub fn is_same_domain(&self, url: &Url) -> bool {
        extract_netloc(url).as_deref() == Some(self.domain.as_str())
    }

    /// Returns true if the URL is the blog's root page
    pub fn is_root(&self, url: &Url) -> bool {
        url.as_str().trim_end_matches('/') == self.root.as_str().trim_end_matches('/')
    }
}

/// Derives the stored artifact path of a post from its URL
///
/// The URL path (without leading slash) becomes the relative path, with a
/// `.html` suffix enforced. Query strings and fragments are ignored.
///
/// # Examples
///
/// ```
/// use blog_mirror::url::post_file_path;
/// use std::path::PathBuf;
/// use url::Url;
///
/// let url = Url::parse("https://example.blogspot.com/2020/01/example.html?m=1").unwrap();
/// assert_eq!(post_file_path(&url).unwrap(), PathBuf::from("2020/01/example.html"));
/// ```
pub fn post_file_path(url: &Url) -> UrlResult<PathBuf> {
    let segments: Vec<&str> = url
        .path()
        .split('/')
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .collect();

    if segments.is_empty() {
        return Err(UrlError::EmptyPath(url.to_string()));
    }

    let mut path: PathBuf = segments.iter().collect();
    if !segments[segments.len() - 1].ends_with(".html") {
        let mut file_name = path.file_name().unwrap_or_default().to_os_string();
        file_name.push(".html");
        path.set_file_name(file_name);
    }

    Ok(path)
}
