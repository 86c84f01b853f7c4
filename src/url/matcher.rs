/// Checks if a host matches a wildcard pattern
///
/// This function supports two types of patterns:
/// 1. Exact match: "example.com" matches only "example.com"
/// 2. Wildcard match: "*.example.com" matches:
///    - "example.com" (the bare host)
///    - "lh3.example.com" (single subdomain)
///    - "a.b.example.com" (nested subdomains)
///
/// # Examples
///
/// ```
/// use blog_mirror::url::matches_wildcard;
///
/// assert!(matches_wildcard("*.googleusercontent.com", "lh3.googleusercontent.com"));
/// assert!(matches_wildcard("*.googleusercontent.com", "blogger.googleusercontent.com"));
/// assert!(!matches_wildcard("*.googleusercontent.com", "example.org"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    if let Some(base) = pattern.strip_prefix("*.") {
        candidate == base || candidate.ends_with(&format!(".{}", base))
    } else {
        candidate == pattern
    }
}

/// Checks if a URL falls under any denylisted URL prefix
///
/// The scheme is ignored on both sides, so an `http://` entry also covers
/// `https://` and protocol-relative (`//host/...`) references. Host case is
/// ignored.
///
/// # Examples
///
/// ```
/// use blog_mirror::url::matches_denylist;
///
/// let denylist = vec!["http://c3.statcounter.com".to_string()];
/// assert!(matches_denylist(&denylist, "http://c3.statcounter.com/t.php?sc=1"));
/// assert!(matches_denylist(&denylist, "https://c3.statcounter.com/t.php"));
/// assert!(matches_denylist(&denylist, "//C3.statcounter.com/t.php"));
/// assert!(!matches_denylist(&denylist, "https://statcounter.com/t.php"));
/// ```
pub fn matches_denylist(denylist: &[String], url: &str) -> bool {
    let candidate = without_scheme(url.trim());
    denylist.iter().any(|entry| {
        let prefix = without_scheme(entry);
        !prefix.is_empty()
            && candidate
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

/// Strips `http://`, `https://` or a leading `//`
fn without_scheme(url: &str) -> &str {
    let has_prefix = |p: &str| url.get(..p.len()).is_some_and(|h| h.eq_ignore_ascii_case(p));
    for scheme in ["http://", "https://", "//"] {
        if has_prefix(scheme) {
            return &url[scheme.len()..];
        }
    }
    url
}
