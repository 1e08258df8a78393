//! FIFO frontier for Base-mode crawls

use crate::url::{normalize_url, strip_fragment};
use crate::UrlResult;
use std::collections::{HashSet, VecDeque};

/// A pending URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Normalized dedup key
    pub key: String,
    /// Fetchable form, original case kept
    pub url: String,
}

/// Pending URLs in insertion order
///
/// A URL is admitted at most once per crawl: membership is remembered even
/// after the entry is popped.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    members: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues `url` at the back unless it was seen before or `is_done`
    /// says it needs no work
    ///
    /// Returns whether the URL was enqueued. Fails if the URL cannot be
    /// normalized.
    pub fn push<F>(&mut self, url: &str, is_done: F) -> UrlResult<bool>
    where
        F: FnOnce(&str) -> bool,
    {
        let fetchable = strip_fragment(url)?;
        let key = normalize_url(&fetchable)?;

        if self.members.contains(&key) || is_done(&key) {
            return Ok(false);
        }

        self.members.insert(key.clone());
        self.queue.push_back(FrontierEntry {
            key,
            url: fetchable,
        });
        Ok(true)
    }

    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of distinct URLs ever admitted
    pub fn seen(&self) -> usize {
        self.members.len()
    }
}
