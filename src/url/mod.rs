//! URL handling module for Sumi-Scribe
//!
//! This module provides URL normalization, domain extraction, link filters,
//! and listing-page URL construction.

mod domain;
mod filter;
mod normalize;
mod pagination;

// Re-export main functions
pub use domain::{extract_domain, same_site, site_host};
pub use filter::{is_binary, is_unwanted, is_within_prefix};
pub use normalize::{normalize_url, strip_fragment};
pub use pagination::{looks_like_pagination, PaginationFormat, PaginationScheme};
