//! Local path derivation for remote images
//!
//! Maps an arbitrary remote image URL to a stable path under the mirror's
//! `images/` directory. The mapping is a pure function of the URL: resumed
//! runs rely on it to find images cached by earlier runs.

use crate::config::ImageConfig;
use crate::url::{extract_host, matches_wildcard};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::LazyLock;
use url::Url;

/// Directory under the mirror root holding cached images
pub const IMAGES_DIR: &str = "images";

/// Resize/quality directives inserted by the optimized-image service,
/// e.g. `w400-h300`, `w640-h480-no`, `s1600`, `s320-h`
static OPTIMIZATION_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[swh]\d+(?:-(?:[swh]\d+|[a-z]{1,3}))*$")
        .expect("optimization pattern is valid")
});

/// Returns true if a path segment is a resize/quality directive
pub fn is_optimization_segment(segment: &str) -> bool {
    OPTIMIZATION_SEGMENT.is_match(segment)
}

/// Where a remote image lives inside the mirror
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImagePath {
    dir: String,
    file_name: String,
}

impl ImagePath {
    /// Directory below `images/`, segments joined with `/` (may be empty)
    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// Sanitized file name
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Path relative to the mirror root, e.g. `images/a/b/photo.jpg`
    pub fn local_path(&self) -> PathBuf {
        let mut path = PathBuf::from(IMAGES_DIR);
        for segment in self.dir.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(&self.file_name);
        path
    }

    /// Site-absolute reference substituted into rewritten HTML, e.g. `/images/a/b/photo.jpg`
    pub fn reference(&self) -> String {
        if self.dir.is_empty() {
            format!("/{}/{}", IMAGES_DIR, self.file_name)
        } else {
            format!("/{}/{}/{}", IMAGES_DIR, self.dir, self.file_name)
        }
    }
}

/// Derives canonical local image paths from remote URLs
#[derive(Debug, Clone)]
pub struct PathDeriver {
    optimized_hosts: Vec<String>,
    service_prefixes: Vec<String>,
    default_extension: String,
}

impl PathDeriver {
    pub fn new(config: &ImageConfig) -> Self {
        Self {
            optimized_hosts: config.optimized_hosts.clone(),
            service_prefixes: config.service_prefixes.clone(),
            default_extension: config.default_extension.clone(),
        }
    }

    /// Returns true if the host belongs to the optimized-image service
    pub fn is_optimized_host(&self, host: &str) -> bool {
        self.optimized_hosts
            .iter()
            .any(|pattern| matches_wildcard(pattern, host))
    }

    /// Maps a remote image URL to its local path
    ///
    /// # Rules
    ///
    /// - Optimized-image hosts: a resize directive in the final segment, or in
    ///   the segment right before the file name, is dropped. A leading service
    ///   prefix segment is dropped. File names without an extension get the
    ///   default extension.
    /// - Other hosts: directory is every segment but the last; the last
    ///   segment is the file name.
    /// - File names keep only ASCII alphanumerics, `.`, `_` and `-`. A name
    ///   left empty by sanitization (or an unparseable URL) falls back to a
    ///   name derived from a SHA-256 of the whole URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use blog_mirror::config::ImageConfig;
    /// use blog_mirror::url::PathDeriver;
    ///
    /// let deriver = PathDeriver::new(&ImageConfig::default());
    /// let remote = "https://lh3.googleusercontent.com/blogger_img/a/b/w400-h300/photo";
    /// let path = deriver.derive(remote);
    /// assert_eq!(path.reference(), "/images/a/b/photo.jpg");
    /// ```
    pub fn derive(&self, remote_url: &str) -> ImagePath {
        let Ok(url) = Url::parse(remote_url) else {
            return ImagePath {
                dir: String::new(),
                file_name: self.fallback_file_name(remote_url),
            };
        };

        let mut segments: Vec<&str> = url
            .path()
            .split('/')
            .filter(|s| !s.is_empty() && *s != "." && *s != "..")
            .collect();

        let optimized = extract_host(&url)
            .map(|host| self.is_optimized_host(&host))
            .unwrap_or(false);

        if optimized {
            self.strip_service_segments(&mut segments);
        }

        let raw_name = segments.pop().unwrap_or_default();
        let dir = segments.join("/");

        let mut file_name = sanitize_file_name(raw_name);
        if file_name.is_empty() {
            tracing::debug!("Degenerate image name in {}, using fallback", remote_url);
            file_name = self.fallback_file_name(remote_url);
        } else if optimized && !file_name.contains('.') {
            file_name = format!("{}.{}", file_name, self.default_extension);
        }

        ImagePath { dir, file_name }
    }

    fn strip_service_segments(&self, segments: &mut Vec<&str>) {
        match segments.len() {
            0 => {}
            len if is_optimization_segment(segments[len - 1]) => {
                segments.pop();
            }
            len if len >= 2 && is_optimization_segment(segments[len - 2]) => {
                segments.remove(len - 2);
            }
            _ => {}
        }

        if segments.len() > 1 && self.service_prefixes.iter().any(|p| p == segments[0]) {
            segments.remove(0);
        }
    }

    fn fallback_file_name(&self, remote_url: &str) -> String {
        let digest = Sha256::digest(remote_url.as_bytes());
        let hex = hex::encode(digest);
        format!("image_{}.{}", &hex[..16], self.default_extension)
    }
}

/// Keeps ASCII alphanumerics, `.`, `_` and `-`; a dots-only result is empty
fn sanitize_file_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    if sanitized.chars().all(|c| c == '.') {
        String::new()
    } else {
        sanitized
    }
}
