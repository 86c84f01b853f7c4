use serde::Deserialize;

/// Main configuration structure for Blog-Mirror
///
/// Every section is optional in the TOML file; missing sections fall back to
/// the defaults below so the tool runs with nothing but a blog URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub images: ImageConfig,
}

/// Crawl traversal and politeness configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Lower bound of the randomized delay before each request (milliseconds)
    #[serde(rename = "min-delay-ms", default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    /// Upper bound of the randomized delay before each request (milliseconds)
    #[serde(rename = "max-delay-ms", default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// CSS selector for the header element wrapping each post link
    #[serde(rename = "post-title-selector", default = "default_post_title_selector")]
    pub post_title_selector: String,

    /// Substrings marking a link as a listing, archive or pager page
    #[serde(rename = "listing-markers", default = "default_listing_markers")]
    pub listing_markers: Vec<String>,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Parent directory; the mirror is written to `<directory>/<blog host>`
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

/// Image caching configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    /// URL prefixes that are referenced but never fetched or rewritten
    #[serde(default = "default_denylist")]
    pub denylist: Vec<String>,

    /// Host patterns (e.g. "*.googleusercontent.com") of the optimized-image service
    #[serde(rename = "optimized-hosts", default = "default_optimized_hosts")]
    pub optimized_hosts: Vec<String>,

    /// Leading path segments owned by the optimized-image service
    #[serde(rename = "service-prefixes", default = "default_service_prefixes")]
    pub service_prefixes: Vec<String>,

    /// Extension appended to optimized-image names that carry none
    #[serde(rename = "default-extension", default = "default_extension")]
    pub default_extension: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            post_title_selector: default_post_title_selector(),
            listing_markers: default_listing_markers(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            denylist: default_denylist(),
            optimized_hosts: default_optimized_hosts(),
            service_prefixes: default_service_prefixes(),
            default_extension: default_extension(),
        }
    }
}

fn default_min_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    1000
}

fn default_post_title_selector() -> String {
    "h3.post-title".to_string()
}

fn default_listing_markers() -> Vec<String> {
    vec![
        "/search/label/".to_string(),
        "/20".to_string(),
        "blog-pager-older-link".to_string(),
    ]
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_output_directory() -> String {
    ".".to_string()
}

fn default_denylist() -> Vec<String> {
    vec![
        "http://www.assoc-amazon.com".to_string(),
        "http://c3.statcounter.com".to_string(),
    ]
}

fn default_optimized_hosts() -> Vec<String> {
    vec!["*.googleusercontent.com".to_string()]
}

fn default_service_prefixes() -> Vec<String> {
    vec!["blogger_img".to_string()]
}

fn default_extension() -> String {
    "jpg".to_string()
}
