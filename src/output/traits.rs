//! Output sink traits and error types
//!
//! This module defines the trait interface for document sinks and the
//! associated error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for extracted Markdown documents
///
/// One document is written per successfully extracted page. The file name is
/// derived from `final_url` only, so writing the same URL twice replaces the
/// earlier document.
pub trait DocumentSink: Send + Sync {
    /// Persists a document and returns the path it was written to
    fn write_document(&self, final_url: &str, markdown: &str) -> OutputResult<PathBuf>;
}
