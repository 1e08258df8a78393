//! Pagination state for Blog-mode walks
//!
//! The walker owns one [`PaginationState`] per listing. After each listing
//! page it reports how many qualifying article links it found, and the state
//! decides whether the walk continues.

use crate::url::{PaginationFormat, PaginationScheme};
use crate::UrlError;
use std::fmt;

/// Stop conditions for one walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkLimits {
    /// Consecutive empty pages that end the walk
    pub max_empty_pages: u32,
    /// Highest page number that will be visited
    pub max_pages: u32,
}

/// What the walker does after a listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkDecision {
    /// Move on to the next page
    Continue,
    /// Page 1 yielded nothing
    FirstPageEmpty,
    /// Too many empty pages in a row
    EmptyStreak,
    /// The page cap was reached
    PageCap,
    /// The next listing URL could not be built
    Unbuildable,
}

impl WalkDecision {
    pub fn is_stop(&self) -> bool {
        !matches!(self, Self::Continue)
    }
}

impl fmt::Display for WalkDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Continue => "continuing",
            Self::FirstPageEmpty => "first page has no articles",
            Self::EmptyStreak => "too many consecutive empty pages",
            Self::PageCap => "page cap reached",
            Self::Unbuildable => "listing URL could not be built",
        };
        f.write_str(text)
    }
}

/// Progress through a paginated listing
#[derive(Debug, Clone)]
pub struct PaginationState {
    base_url: String,
    page: u32,
    empty_streak: u32,
    scheme: PaginationScheme,
}

impl PaginationState {
    /// Starts a walk at page 1, detecting the numbering scheme from `base_url`
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            page: 1,
            empty_streak: 0,
            scheme: PaginationScheme::detect(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn empty_streak(&self) -> u32 {
        self.empty_streak
    }

    pub fn format(&self) -> PaginationFormat {
        self.scheme.format
    }

    pub fn param(&self) -> &str {
        &self.scheme.param
    }

    /// URL of the current listing page
    pub fn current_url(&self) -> Result<String, UrlError> {
        self.scheme.page_url(&self.base_url, self.page)
    }

    /// Records the outcome of the current page and advances if the walk goes on
    ///
    /// An empty first page ends the walk at once. Later empty pages only
    /// count toward the streak limit.
    pub fn finish_page(&mut self, articles_found: usize, limits: WalkLimits) -> WalkDecision {
        if articles_found == 0 {
            self.empty_streak += 1;
            if self.page == 1 {
                return WalkDecision::FirstPageEmpty;
            }
            if self.empty_streak >= limits.max_empty_pages {
                return WalkDecision::EmptyStreak;
            }
        } else {
            self.empty_streak = 0;
        }

        if self.page >= limits.max_pages {
            return WalkDecision::PageCap;
        }

        self.page += 1;
        WalkDecision::Continue
    }
}
