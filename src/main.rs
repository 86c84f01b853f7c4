//! Blog-Mirror main entry point
//!
//! This is the command-line interface for the Blog-Mirror static blog archiver.

use anyhow::Context;
use blog_mirror::config::{load_optional_config, Config};
use blog_mirror::crawler::mirror;
use blog_mirror::output::{compare_urls, count_html_files, print_comparison, print_html_counts};
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Blog-Mirror: a resumable Blogspot archiver
///
/// Blog-Mirror walks a blog's listing, archive and pager pages, stores every
/// post as a static HTML file with its images cached locally, and can be
/// interrupted and rerun at any time without fetching finished posts again.
#[derive(Parser, Debug)]
#[command(name = "blog-mirror")]
#[command(version)]
#[command(about = "A resumable Blogspot blog mirror", long_about = None)]
struct Cli {
    /// Root URL of the blog (prompted for when omitted)
    #[arg(value_name = "URL", conflicts_with_all = ["count_html", "compare"])]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Count stored HTML files per directory of a mirror and exit
    #[arg(long, value_name = "DIR", conflicts_with = "compare")]
    count_html: Option<PathBuf>,

    /// Compare DIR/expected.json with DIR/processed_urls.json and exit
    #[arg(long, value_name = "DIR", conflicts_with = "count_html")]
    compare: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Some(dir) = &cli.count_html {
        return handle_count_html(dir);
    }
    if let Some(dir) = &cli.compare {
        return handle_compare(dir);
    }

    let config = load_optional_config(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Invalid default configuration".to_string(),
    })?;

    let url = match cli.url {
        Some(url) => url,
        None => prompt_for_url().context("Failed to read blog URL from stdin")?,
    };

    handle_mirror(config, &url).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("blog_mirror=info,warn"),
            1 => EnvFilter::new("blog_mirror=debug,info"),
            2 => EnvFilter::new("blog_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Asks for the blog URL on stdin
fn prompt_for_url() -> anyhow::Result<String> {
    print!("Enter the URL of the blog: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;

    let url = line.trim();
    anyhow::ensure!(!url.is_empty(), "No blog URL given");
    Ok(url.to_string())
}

/// Handles the --count-html mode
fn handle_count_html(dir: &Path) -> anyhow::Result<()> {
    let counts = count_html_files(dir)
        .with_context(|| format!("Failed to count HTML files in {}", dir.display()))?;
    print_html_counts(dir, &counts);
    Ok(())
}

/// Handles the --compare mode
fn handle_compare(dir: &Path) -> anyhow::Result<()> {
    let comparison = compare_urls(dir)
        .with_context(|| format!("Failed to compare URL lists in {}", dir.display()))?;
    print_comparison(comparison.as_ref());
    Ok(())
}

/// Handles the main mirror operation
async fn handle_mirror(config: Config, url: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Politeness delay {}-{}ms, output under {}",
        config.crawler.min_delay_ms,
        config.crawler.max_delay_ms,
        config.output.directory
    );

    match mirror(config, url).await {
        Ok(stats) => {
            tracing::info!(
                "Mirror finished: {} posts stored, {} failed",
                stats.posts_stored,
                stats.posts_failed
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Mirror failed: {}", e);
            Err(e).with_context(|| format!("Could not mirror {}", url))
        }
    }
}
