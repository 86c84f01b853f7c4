//! State module for tracking mirror progress
//!
//! This module provides the state owned by a single mirroring run.
//!
//! # Components
//!
//! - `PageState`: Traversal state of a listing page (queued, visited, discarded)
//! - `Frontier`: Listing pages still to visit plus those already handled this run
//! - `ProcessedSet`: Durable record of completed posts, the sole source of resume state

mod frontier;
mod page_state;
mod processed_set;

// Re-export main types
pub use frontier::Frontier;
pub use page_state::PageState;
pub use processed_set::{ProcessedSet, PROCESSED_URLS_FILE};
