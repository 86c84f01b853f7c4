//! Listing-page frontier for a single run
//!
//! Tracks which listing/archive pages are waiting to be visited and which
//! have already been handled. Nothing here is persisted: a resumed run
//! rebuilds the frontier from the blog's root.

use crate::state::PageState;
use std::collections::{HashMap, VecDeque};
use url::Url;

/// Worklist of listing pages plus the state of every page seen this run
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<Url>,
    states: HashMap<String, PageState>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier holding only the seed URL
    pub fn seeded(seed: Url) -> Self {
        let mut frontier = Self::new();
        frontier.enqueue(seed);
        frontier
    }

    /// Adds a page to the queue
    ///
    /// # Returns
    ///
    /// * `true` - The page was newly queued
    /// * `false` - The page is already queued, visited or discarded
    pub fn enqueue(&mut self, url: Url) -> bool {
        if self.states.contains_key(url.as_str()) {
            return false;
        }

        self.states.insert(url.as_str().to_string(), PageState::Queued);
        self.queue.push_back(url);
        true
    }

    /// Removes the next page from the queue
    ///
    /// The page stays `Queued` until the caller marks it visited or discarded.
    pub fn pop(&mut self) -> Option<Url> {
        self.queue.pop_front()
    }

    /// Records a page's terminal state
    ///
    /// # Returns
    ///
    /// * `true` - The transition was applied
    /// * `false` - The page is unknown or already terminal
    pub fn mark(&mut self, url: &Url, next: PageState) -> bool {
        match self.states.get_mut(url.as_str()) {
            Some(state) if state.can_transition_to(next) => {
                *state = next;
                true
            }
            _ => false,
        }
    }

    /// Current state of a page, if it has been seen this run
    pub fn state(&self, url: &Url) -> Option<PageState> {
        self.states.get(url.as_str()).copied()
    }

    /// Returns true if nothing is waiting to be visited
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of pages waiting to be visited
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Number of pages in the given state
    pub fn count(&self, state: PageState) -> usize {
        self.states.values().filter(|s| **s == state).count()
    }
}
