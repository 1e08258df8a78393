//! Crawler module for page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - Rendering pages and downloading binaries behind pluggable traits
//! - A concurrency-bounded fetch executor shared by every task
//! - Base mode: FIFO crawl under a URL prefix
//! - Blog mode: sequential walk over a paginated article listing
//! - Dispatch over the configured site list

mod base;
mod blog;
mod context;
mod dispatch;
mod download;
mod executor;
mod frontier;
mod page;
mod renderer;

pub use base::{crawl_base, BaseReport};
pub use blog::{listing_articles, walk_blog, BlogReport, ListingScope};
pub use context::CrawlContext;
pub use dispatch::{run_site, run_sites, SiteOutcome};
pub use download::{binary_filename, hashed_binary_filename, Downloader, HttpDownloader};
pub use executor::{FetchExecutor, Fetched};
pub use frontier::{Frontier, FrontierEntry};
pub use page::{process_page, PageMode, SiteJob};
pub use renderer::{build_http_client, FetchResult, HttpRenderer, RenderOptions, Renderer};

use crate::config::{Config, SiteRecord};
use crate::ScribeError;
use std::sync::Arc;

/// Runs a complete harvest with the production collaborators
///
/// This is the main entry point. It will:
/// 1. Load the visited log
/// 2. Open a fresh error log
/// 3. Build the HTTP renderer and downloader
/// 4. Process every site record in order
pub async fn harvest(
    config: Config,
    sites: &[SiteRecord],
) -> Result<(Arc<CrawlContext>, Vec<SiteOutcome>), ScribeError> {
    let ctx = Arc::new(CrawlContext::from_config(config)?);
    let outcomes = run_sites(ctx.clone(), sites).await;
    Ok((ctx, outcomes))
}
