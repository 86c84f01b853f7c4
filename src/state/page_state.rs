/// Page state definitions for tracking listing-page traversal
///
/// This module defines the states a listing page can be in during one run.
use std::fmt;

/// Represents the current state of a listing page in the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Page has been discovered and is waiting to be visited
    Queued,

    // ===== Terminal States =====
    /// Page was taken from the queue and fetched (successfully or not)
    Visited,

    /// Page is on another host and was dropped without fetching
    Discarded,
}

impl PageState {
    /// Returns true if this is a terminal state (the page is never queued again)
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Returns true if the page is still waiting in the queue
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Queued)
    }

    /// Checks whether a transition to `next` is allowed
    ///
    /// Only `Queued -> Visited` and `Queued -> Discarded` are valid.
    pub fn can_transition_to(&self, next: PageState) -> bool {
        self.is_active() && next.is_terminal()
    }

    /// Short lowercase label used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Visited => "visited",
            Self::Discarded => "discarded",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
