use url::Url;

/// Extracts the host from a URL, lowercased
///
/// # Examples
///
/// ```
/// use url::Url;
/// use blog_mirror::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.blogspot.com/2020/01/post.html").unwrap();
/// assert_eq!(extract_host(&url), Some("example.blogspot.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Extracts the network location (host plus any explicit port) from a URL
///
/// This is the identity used to decide whether a page belongs to the blog
/// being mirrored, and it names the mirror's output directory.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use blog_mirror::url::extract_netloc;
///
/// let url = Url::parse("https://example.blogspot.com/").unwrap();
/// assert_eq!(extract_netloc(&url), Some("example.blogspot.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_netloc(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_netloc(url: &Url) -> Option<String> {
    let host = extract_host(url)?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_host() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(extract_host(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_host_ignores_port() {
        let url = Url::parse("https://example.com:8080/").unwrap();
        assert_eq!(extract_host(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_mixed_case() {
        let url = Url::parse("https://Example.COM/").unwrap();
        assert_eq!(extract_host(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_netloc_with_explicit_port() {
        let url = Url::parse("http://localhost:3000/page").unwrap();
        assert_eq!(extract_netloc(&url), Some("localhost:3000".to_string()));
    }

    #[test]
    fn test_netloc_default_port_omitted() {
        let url = Url::parse("https://example.com:443/page").unwrap();
        assert_eq!(extract_netloc(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_netloc_without_host() {
        let url = Url::parse("data:text/plain,hello").unwrap();
        assert_eq!(extract_netloc(&url), None);
    }
}
