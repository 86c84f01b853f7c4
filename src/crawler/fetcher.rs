//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the mirror, including:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests for listing pages, posts and images
//! - Classifying failures into HTTP status and network errors
//!
//! The pipeline only sees the [`Fetcher`] trait, so it can be driven by
//! in-memory doubles in tests.

use crate::config::HttpConfig;
use crate::MirrorError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the resource
    Success {
        /// Final URL after redirects
        final_url: String,
        /// Response body
        body: Vec<u8>,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns true if the resource was fetched
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Converts into the body bytes or a transport-level error for `url`
    pub fn into_body(self, url: &str) -> Result<Vec<u8>, MirrorError> {
        match self {
            Self::Success { final_url, body } => {
                if final_url != url {
                    tracing::debug!("Followed redirect {} -> {}", url, final_url);
                }
                Ok(body)
            }
            Self::HttpError { status_code } => Err(MirrorError::HttpStatus {
                url: url.to_string(),
                status: status_code,
            }),
            Self::NetworkError { error } => Err(MirrorError::Transport {
                url: url.to_string(),
                message: error,
            }),
        }
    }
}

/// Fetch collaborator consumed by the mirroring pipeline
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Performs a GET request for the URL
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from the configuration
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        fetch_url(&self.client, url).await
    }
}

/// Fetches a URL and classifies the outcome
///
/// Redirects are followed by the client. Any 2xx status is a success;
/// other statuses become [`FetchResult::HttpError`] and transport failures
/// become [`FetchResult::NetworkError`].
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    match response.bytes().await {
        Ok(body) => FetchResult::Success {
            final_url,
            body: body.to_vec(),
        },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}
