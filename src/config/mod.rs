//! Configuration module for Blog-Mirror
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All keys are optional; [`Config::default`] is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use blog_mirror::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mirror.toml")).unwrap();
//! println!("Delay window: {}..{}ms", config.crawler.min_delay_ms, config.crawler.max_delay_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig, ImageConfig, OutputConfig};

// Re-export parser functions
pub use parser::{load_config, load_optional_config, parse_config};
pub use validation::validate;
