//! Configuration module for Sumi-Scribe
//!
//! This module handles loading, parsing, and validating the TOML configuration
//! file and the CSV list of target sites.
//!
//! # Example
//!
//! ```no_run
//! use sumi_scribe::config::{load_config, load_sites};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scribe.toml")).unwrap();
//! let sites = load_sites(Path::new("sites.csv")).unwrap();
//! println!("{} sites, {} concurrent fetches", sites.len(), config.crawler.max_concurrency);
//! ```

mod parser;
mod sites;
mod types;
mod validation;

// Re-export types
pub use sites::{load_sites, read_sites, SiteKind, SiteRecord};
pub use types::{Config, CrawlerConfig, FilterConfig, OutputConfig, UserAgentConfig};
pub use validation::validate_site;

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
