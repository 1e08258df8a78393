//! Storage module for persisting crawl progress
//!
//! The only durable state a run keeps is the visited log: the set of
//! normalized URLs already processed, shared by every site and every run.

mod traits;
mod visited;

pub use traits::{StorageError, StorageResult, VisitedLog};
pub use visited::VisitedStore;

use std::path::Path;

/// Opens the visited log at `path`, creating it when absent
pub fn open_visited(path: &Path) -> StorageResult<VisitedStore> {
    VisitedStore::open(path)
}
