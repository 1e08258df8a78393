//! Output module for everything a run leaves on disk
//!
//! This module handles:
//! - Writing one Markdown document per extracted page
//! - Classifying and logging per-URL failures
//! - Recording run statistics

mod error_log;
mod markdown;
pub mod stats;
mod traits;

pub use error_log::{format_entry, ErrorKind, ErrorLog};
pub use markdown::{hashed_filename, sanitize_filename, MarkdownWriter, HEADER_PREFIX};
pub(crate) use markdown::url_hash;
pub use stats::{print_statistics, RunStats, StatsSnapshot};
pub use traits::{DocumentSink, OutputError, OutputResult};

use std::path::{Path, PathBuf};

/// Output directory for one site's documents
///
/// The source name has path separators and spaces replaced so it always
/// names a single directory under `output_root`.
pub fn site_output_dir(output_root: &Path, safe_source: &str) -> PathBuf {
    output_root.join(safe_source)
}
