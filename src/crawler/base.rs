//! Base mode: breadth-first crawl under a URL prefix
//!
//! A single coordinating loop owns the [`Frontier`]. It pops URLs in FIFO
//! order and spawns page tasks up to the executor's capacity; as each task
//! finishes its links are filtered and appended to the frontier. The crawl
//! ends when the frontier is empty and no task is running.

use crate::crawler::context::CrawlContext;
use crate::crawler::frontier::Frontier;
use crate::crawler::page::{process_page, PageMode, SiteJob};
use crate::url::{is_unwanted, is_within_prefix, normalize_url};
use crate::ScribeError;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Totals for one Base crawl
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BaseReport {
    /// Page tasks started
    pub pages: usize,
    /// Distinct URLs admitted to the frontier
    pub enqueued: usize,
}

/// Crawls every page reachable from the site URL without leaving its prefix
pub async fn crawl_base(ctx: Arc<CrawlContext>, job: Arc<SiteJob>) -> BaseReport {
    let start = job.site.url.clone();
    let prefix = match normalize_url(&start) {
        Ok(prefix) => prefix,
        Err(e) => {
            ctx.report(&start, &ScribeError::from(e), "Base crawl");
            return BaseReport::default();
        }
    };

    let mut frontier = Frontier::new();
    match frontier.push(&start, |key| ctx.is_done(key)) {
        Ok(true) => {}
        Ok(false) => {
            tracing::info!("{} already visited, nothing to crawl", start);
            ctx.stats.skipped_visited();
            return BaseReport::default();
        }
        Err(e) => {
            ctx.report(&start, &ScribeError::from(e), "Base crawl");
            return BaseReport::default();
        }
    }

    tracing::info!("Starting Base crawl of {} (prefix {})", start, prefix);

    let capacity = ctx.executor.capacity();
    let mut in_flight = JoinSet::new();
    let mut report = BaseReport::default();

    loop {
        while in_flight.len() < capacity {
            let Some(entry) = frontier.pop() else {
                break;
            };
            if ctx.is_done(&entry.key) {
                ctx.stats.skipped_visited();
                continue;
            }
            report.pages += 1;
            in_flight.spawn(process_page(
                ctx.clone(),
                job.clone(),
                entry.url,
                PageMode::Crawl,
            ));
        }

        let links = match in_flight.join_next().await {
            None => break,
            Some(Ok(links)) => links,
            Some(Err(e)) => {
                tracing::error!("Page task failed: {}", e);
                continue;
            }
        };

        for link in links {
            enqueue_link(&ctx, &mut frontier, &prefix, &link);
        }

        tracing::debug!(
            "Frontier: {} queued, {} in flight, {} seen",
            frontier.len(),
            in_flight.len(),
            frontier.seen()
        );
    }

    report.enqueued = frontier.seen();
    tracing::info!(
        "Base crawl of {} finished: {} pages, {} URLs admitted",
        start,
        report.pages,
        report.enqueued
    );
    report
}

/// Applies the Base-mode link filters and enqueues survivors
fn enqueue_link(ctx: &CrawlContext, frontier: &mut Frontier, prefix: &str, link: &str) {
    let key = match normalize_url(link) {
        Ok(key) => key,
        Err(e) => {
            let error = ScribeError::LinkProcessing {
                link: link.to_string(),
                message: e.to_string(),
            };
            ctx.report(link, &error, "Link processing");
            return;
        }
    };

    if !is_within_prefix(&key, prefix) || is_unwanted(link, &ctx.filter().unwanted_keywords) {
        return;
    }

    if let Err(e) = frontier.push(link, |candidate| ctx.is_done(candidate)) {
        let error = ScribeError::LinkProcessing {
            link: link.to_string(),
            message: e.to_string(),
        };
        ctx.report(link, &error, "Link processing");
    }
}
