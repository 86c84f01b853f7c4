//! HTML parsing and rewriting
//!
//! This module handles:
//! - Extracting post links (anchors inside post-title headers)
//! - Extracting listing/archive/pager links worth crawling
//! - Collecting image sources from a post
//! - Rewriting image sources in place (lol_html, byte-preserving elsewhere)

use crate::config::CrawlerConfig;
use crate::ConfigError;
use lol_html::{element, HtmlRewriter, Settings};
use scraper::{ElementRef, Html, Selector};
use std::collections::{HashMap, HashSet};
use url::Url;

/// Links found on a listing page
#[derive(Debug, Clone, Default)]
pub struct ListingLinks {
    /// Post permalinks, in document order
    pub posts: Vec<Url>,

    /// Listing, archive and pager pages to crawl, in document order
    pub pages: Vec<Url>,
}

/// Extracts post and listing links from blog pages
#[derive(Debug, Clone)]
pub struct PageParser {
    post_title: Selector,
    anchor: Selector,
    listing_markers: Vec<String>,
}

impl PageParser {
    /// Builds a parser from the crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(PageParser)` - Selectors compiled
    /// * `Err(ConfigError)` - The post-title selector is not valid CSS
    pub fn new(config: &CrawlerConfig) -> Result<Self, ConfigError> {
        let post_title = Selector::parse(&config.post_title_selector).map_err(|_| {
            ConfigError::Validation(format!(
                "post_title_selector is not a valid CSS selector: '{}'",
                config.post_title_selector
            ))
        })?;
        let anchor = Selector::parse("a[href]")
            .map_err(|_| ConfigError::Validation("anchor selector".to_string()))?;

        Ok(Self {
            post_title,
            anchor,
            listing_markers: config.listing_markers.clone(),
        })
    }

    /// Parses a listing page and extracts its links
    ///
    /// # Link Extraction Rules
    ///
    /// **Posts:** the first `<a href>` inside each post-title element.
    ///
    /// **Pages:** any `<a href>` whose resolved URL contains `base` and
    /// that carries a listing marker in its URL, `class` or `id`.
    ///
    /// Links are resolved against `page_url`; `javascript:`, `mailto:`,
    /// `tel:`, `data:` and fragment-only links are ignored, fragments are
    /// stripped, and duplicates are dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use blog_mirror::config::CrawlerConfig;
    /// use blog_mirror::crawler::PageParser;
    /// use url::Url;
    ///
    /// let parser = PageParser::new(&CrawlerConfig::default()).unwrap();
    /// let page = Url::parse("https://example.blogspot.com/").unwrap();
    /// let html = r#"<h3 class="post-title"><a href="/2020/01/example.html">Example</a></h3>
    ///               <a href="https://example.blogspot.com/2020/">2020</a>"#;
    /// let links = parser.parse_listing(html, &page, "https://example.blogspot.com");
    /// assert_eq!(links.posts[0].as_str(), "https://example.blogspot.com/2020/01/example.html");
    /// assert!(links.pages.iter().any(|u| u.as_str() == "https://example.blogspot.com/2020/"));
    /// ```
    pub fn parse_listing(&self, html: &str, page_url: &Url, base: &str) -> ListingLinks {
        let document = Html::parse_document(html);

        ListingLinks {
            posts: self.extract_post_links(&document, page_url),
            pages: self.extract_page_links(&document, page_url, base),
        }
    }

    fn extract_post_links(&self, document: &Html, page_url: &Url) -> Vec<Url> {
        let mut seen = HashSet::new();
        let mut posts = Vec::new();

        for header in document.select(&self.post_title) {
            let href = header
                .select(&self.anchor)
                .next()
                .and_then(|a| a.value().attr("href"));

            if let Some(url) = href.and_then(|h| resolve_link(h, page_url)) {
                if seen.insert(url.as_str().to_string()) {
                    posts.push(url);
                }
            }
        }

        posts
    }

    fn extract_page_links(&self, document: &Html, page_url: &Url, base: &str) -> Vec<Url> {
        let mut seen = HashSet::new();
        let mut pages = Vec::new();

        for anchor in document.select(&self.anchor) {
            let Some(url) = anchor
                .value()
                .attr("href")
                .and_then(|h| resolve_link(h, page_url))
            else {
                continue;
            };

            if !url.as_str().contains(base) || !self.has_listing_marker(&anchor, &url) {
                continue;
            }

            if seen.insert(url.as_str().to_string()) {
                pages.push(url);
            }
        }

        pages
    }

    fn has_listing_marker(&self, anchor: &ElementRef<'_>, url: &Url) -> bool {
        let class = anchor.value().attr("class").unwrap_or("");
        let id = anchor.value().attr("id").unwrap_or("");

        self.listing_markers.iter().any(|marker| {
            url.as_str().contains(marker.as_str())
                || class.contains(marker.as_str())
                || id.contains(marker.as_str())
        })
    }
}

/// Collects the distinct `src` values of `<img>` elements, in document order
pub fn extract_image_sources(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("img[src]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    document
        .select(&selector)
        .filter_map(|img| img.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .filter(|src| seen.insert(src.to_string()))
        .map(str::to_string)
        .collect()
}

/// Rewrites `<img src>` values found in `replacements`
///
/// Keys are decoded attribute values (as returned by
/// [`extract_image_sources`]). Everything outside rewritten attributes is
/// passed through byte for byte.
///
/// # Returns
///
/// Tuple of (rewritten HTML, number of attributes rewritten)
pub fn rewrite_image_sources(
    html: &[u8],
    replacements: &HashMap<String, String>,
) -> Result<(Vec<u8>, usize), String> {
    let mut output = Vec::with_capacity(html.len());
    let mut rewritten = 0usize;

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![element!("img[src]", |el| {
                if let Some(raw) = el.get_attribute("src") {
                    let decoded = html_escape::decode_html_entities(&raw);
                    if let Some(local) = replacements.get(decoded.trim()) {
                        el.set_attribute("src", local)?;
                        rewritten += 1;
                    }
                }
                Ok(())
            })],
            ..Settings::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    rewriter
        .write(html)
        .map_err(|e| format!("HTML rewrite error: {}", e))?;
    rewriter
        .end()
        .map_err(|e| format!("HTML rewrite finalization error: {}", e))?;

    Ok((output, rewritten))
}

/// Resolves a link href to an absolute HTTP(S) URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }

    absolute_url.set_fragment(None);
    Some(absolute_url)
}
