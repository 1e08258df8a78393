//! Site dispatch: run the right traversal for each site record

use crate::config::{validate_site, SiteKind, SiteRecord};
use crate::crawler::base::crawl_base;
use crate::crawler::blog::walk_blog;
use crate::crawler::context::CrawlContext;
use crate::crawler::page::SiteJob;
use crate::extract::ContentSelection;
use crate::output::{site_output_dir, ErrorKind, MarkdownWriter, StatsSnapshot};
use crate::ScribeError;
use std::sync::Arc;

/// What happened to one site record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteOutcome {
    /// The traversal ran; counters cover this site only
    Crawled(StatsSnapshot),
    /// A `stop` or `pause` record
    Halted,
    /// Unknown type or unusable record
    Skipped(String),
}

/// Processes every site record in order
///
/// Sites are independent: a failing site is logged and the run moves on.
pub async fn run_sites(ctx: Arc<CrawlContext>, sites: &[SiteRecord]) -> Vec<SiteOutcome> {
    let mut outcomes = Vec::with_capacity(sites.len());

    for (index, site) in sites.iter().enumerate() {
        tracing::info!(
            "Site {}/{}: {} [{}] {}",
            index + 1,
            sites.len(),
            site.source,
            site.kind,
            site.url
        );
        let outcome = run_site(ctx.clone(), site).await;
        if let SiteOutcome::Crawled(delta) = &outcome {
            tracing::info!(
                "Finished {}: {} pages, {} documents, {} binaries, {} errors",
                site.url,
                delta.pages_fetched,
                delta.documents_written,
                delta.binaries_downloaded,
                delta.total_errors()
            );
        }
        outcomes.push(outcome);
    }

    outcomes
}

/// Processes a single site record
pub async fn run_site(ctx: Arc<CrawlContext>, site: &SiteRecord) -> SiteOutcome {
    match &site.kind {
        SiteKind::Stop | SiteKind::Pause => {
            tracing::info!("'{}' record for {}, nothing to do", site.kind, site.source);
            return SiteOutcome::Halted;
        }
        SiteKind::Other(kind) => {
            tracing::warn!("Unknown site type '{}' for {}, skipping", kind, site.url);
            return SiteOutcome::Skipped(format!("unknown type '{}'", kind));
        }
        SiteKind::Base | SiteKind::Blog => {}
    }

    let job = match prepare_job(&ctx, site) {
        Ok(job) => Arc::new(job),
        Err(e) => {
            ctx.errors
                .log(&site.url, ErrorKind::Scraping, &e.to_string(), "Site setup");
            return SiteOutcome::Skipped(e.to_string());
        }
    };

    let before = ctx.stats.snapshot();
    match site.kind {
        SiteKind::Blog => {
            let report = walk_blog(ctx.clone(), job).await;
            tracing::debug!(
                "Blog walk of {}: {} listing pages, {} articles, stop: {:?}",
                site.url,
                report.pages,
                report.articles,
                report.stop
            );
        }
        _ => {
            let report = crawl_base(ctx.clone(), job).await;
            tracing::debug!(
                "Base crawl of {}: {} page tasks, {} URLs admitted",
                site.url,
                report.pages,
                report.enqueued
            );
        }
    }
    SiteOutcome::Crawled(ctx.stats.snapshot().since(&before))
}

fn prepare_job(ctx: &CrawlContext, site: &SiteRecord) -> Result<SiteJob, ScribeError> {
    validate_site(site)?;
    let selection = ContentSelection::from_site(site)?;

    let output_dir = site_output_dir(&ctx.config.output.output_root, &site.safe_source());
    let writer = MarkdownWriter::new(&output_dir, ctx.config.output.max_filename_length)?;

    Ok(SiteJob {
        site: site.clone(),
        selection,
        sink: Arc::new(writer),
        output_dir,
    })
}
