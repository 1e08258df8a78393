//! Storage traits and error types
//!
//! This module defines the trait interface for visited-URL backends and
//! associated error types.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot record '{0}': {1}")]
    InvalidKey(String, String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for the durable set of URLs that have already been processed
///
/// Keys are normalized before lookup, so callers may pass URLs in any form
/// the normalizer accepts. Implementations must be safe to share between
/// concurrent page tasks.
pub trait VisitedLog: Send + Sync {
    /// Checks whether a URL was processed in this or any earlier run
    fn contains(&self, url: &str) -> bool;

    /// Marks a URL as processed
    ///
    /// Returns `true` when the URL was new. Recording an already known URL
    /// is a no-op and writes nothing.
    fn record(&self, url: &str) -> StorageResult<bool>;

    /// Number of distinct URLs known
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
