//! Sumi-Scribe: a site harvester that turns selected HTML into Markdown
//!
//! This crate walks configured websites either by following same-prefix links
//! ("Base" mode) or by stepping through paginated article listings ("Blog"
//! mode), extracts the configured content subtree from every page, and writes
//! one Markdown document per page. Processed URLs are appended to a visited log
//! so later runs never repeat work.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use output::ErrorKind;
use thiserror::Error;

/// Main error type for Sumi-Scribe operations
#[derive(Debug, Error)]
pub enum ScribeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Link processing error for {link}: {message}")]
    LinkProcessing { link: String, message: String },

    #[error("Binary transfer failed for {url}: {message}")]
    BinaryTransfer { url: String, message: String },

    #[error("Cannot build page {page} from {base}: {message}")]
    PaginationConstruction {
        base: String,
        page: u32,
        message: String,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl ScribeError {
    /// Maps the error onto the category written to the error log
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Render(_) | Self::Reqwest(_) => ErrorKind::Network,
            Self::BinaryTransfer { .. } => ErrorKind::PdfDownload,
            _ => ErrorKind::Scraping,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to read site list: {0}")]
    Csv(#[from] csv::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Failures reported by a page renderer
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Timed out after {timeout_ms}ms loading {url}")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Render engine error for {url}: {message}")]
    Engine { url: String, message: String },
}

/// Failures while pulling content out of rendered HTML
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Main container '{selector}' not found")]
    MissingContainer { selector: String },

    #[error("No content found with selector '{selector}'")]
    MissingContent { selector: String },
}

/// Result type alias for Sumi-Scribe operations
pub type Result<T> = std::result::Result<T, ScribeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, SiteKind, SiteRecord};
pub use crawler::{run_sites, CrawlContext, FetchExecutor, FetchResult, Renderer};
pub use extract::{extract, ContentSelection, SelectorKind};
pub use url::normalize_url;
