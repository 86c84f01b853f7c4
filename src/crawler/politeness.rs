//! Politeness pacing for outgoing requests
//!
//! Every document or image fetch is preceded by a pause drawn uniformly from
//! the configured `[min, max]` window. Requests are issued one at a time, so
//! this bounds the request rate against the blog's hosts.

use crate::config::CrawlerConfig;
use rand::Rng;
use std::time::Duration;

/// Randomized delay applied before each request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Politeness {
    min: Duration,
    max: Duration,
}

impl Politeness {
    /// Creates a pacer with the given bounds (swapped if given in reverse)
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Creates a pacer from the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            Duration::from_millis(config.min_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )
    }

    /// A pacer that never waits
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Lower bound of the delay window
    pub fn min(&self) -> Duration {
        self.min
    }

    /// Upper bound of the delay window
    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draws the next delay from the window
    pub fn next_delay(&self) -> Duration {
        let min_ms = self.min.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        if min_ms == max_ms {
            return self.min;
        }
        Duration::from_millis(rand::rng().random_range(min_ms..=max_ms))
    }

    /// Sleeps for a freshly drawn delay
    pub async fn pause(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tracing::trace!("Politeness delay: {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }
}
