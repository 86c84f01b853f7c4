//! Blog-Mirror: a resumable static mirror for hosted blogs
//!
//! This crate crawls the listing pages of a hosted blog, fetches every post it
//! discovers, rewrites embedded images to locally cached copies and stores the
//! result under a deterministic on-disk layout. Completed posts are recorded in
//! `processed_urls.json` so an interrupted run can be resumed without
//! re-fetching finished work.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Blog-Mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("HTML rewrite error for {url}: {message}")]
    HtmlRewrite { url: String, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid host pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("URL has no path to store under: {0}")]
    EmptyPath(String),
}

/// Result type alias for Blog-Mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, Outcome, SkipReason};
pub use state::{Frontier, PageState, ProcessedSet};
pub use url::{BlogTarget, ImagePath, PathDeriver};
