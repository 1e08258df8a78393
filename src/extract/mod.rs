//! Content extraction
//!
//! Turns rendered HTML into Markdown using per-site selectors, and pulls
//! hyperlinks out of pages and article listings.

mod content;
mod links;
mod selector;

pub use content::{extract, extract_markdown, ExtractOptions};
pub use links::{article_links, page_links, resolve_link};
pub use selector::{ContentSelection, ElementSelector, SelectorKind};
