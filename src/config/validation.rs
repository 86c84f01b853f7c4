use crate::config::types::{Config, CrawlerConfig, HttpConfig, ImageConfig, OutputConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Longest politeness delay accepted (milliseconds)
const MAX_DELAY_CEILING_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    validate_image_config(&config.images)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.min_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "min_delay_ms ({}) must not exceed max_delay_ms ({})",
            config.min_delay_ms, config.max_delay_ms
        )));
    }

    if config.max_delay_ms > MAX_DELAY_CEILING_MS {
        return Err(ConfigError::Validation(format!(
            "max_delay_ms must be <= {}ms, got {}ms",
            MAX_DELAY_CEILING_MS, config.max_delay_ms
        )));
    }

    if Selector::parse(&config.post_title_selector).is_err() {
        return Err(ConfigError::Validation(format!(
            "post_title_selector is not a valid CSS selector: '{}'",
            config.post_title_selector
        )));
    }

    if config.listing_markers.is_empty() {
        return Err(ConfigError::Validation(
            "listing_markers must contain at least one marker".to_string(),
        ));
    }

    if config.listing_markers.iter().any(|m| m.is_empty()) {
        return Err(ConfigError::Validation(
            "listing_markers cannot contain empty markers".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates image caching configuration
fn validate_image_config(config: &ImageConfig) -> Result<(), ConfigError> {
    for prefix in &config.denylist {
        let url = Url::parse(prefix).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid denylist entry '{}': {}", prefix, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Denylist entry '{}' must use an HTTP(S) scheme",
                prefix
            )));
        }
    }

    for pattern in &config.optimized_hosts {
        validate_host_pattern(pattern)?;
    }

    if config.service_prefixes.iter().any(|p| p.is_empty() || p.contains('/')) {
        return Err(ConfigError::Validation(
            "service_prefixes must be single non-empty path segments".to_string(),
        ));
    }

    if config.default_extension.is_empty()
        || !config
            .default_extension
            .chars()
            .all(|c| c.is_ascii_alphanumeric())
    {
        return Err(ConfigError::Validation(format!(
            "default_extension must be non-empty and alphanumeric, got '{}'",
            config.default_extension
        )));
    }

    Ok(())
}

/// Validates a host pattern (supports wildcards)
fn validate_host_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Host pattern cannot be empty".to_string(),
        ));
    }

    if let Some(host) = pattern.strip_prefix("*.") {
        validate_host_string(host)
    } else {
        validate_host_string(pattern)
    }
}

/// Validates a host string (without wildcard prefix)
fn validate_host_string(host: &str) -> Result<(), ConfigError> {
    if host.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Host cannot be empty".to_string(),
        ));
    }

    if !host
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' contains invalid characters",
            host
        )));
    }

    if host.starts_with('.') || host.ends_with('.') || host.starts_with('-') || host.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' cannot start or end with '.' or '-'",
            host
        )));
    }

    if host.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' cannot contain consecutive dots",
            host
        )));
    }

    if !host.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' must contain at least one dot (e.g., 'example.com')",
            host
        )));
    }

    Ok(())
}
