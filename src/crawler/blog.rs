//! Blog mode: walk a paginated article listing
//!
//! Listing pages are visited strictly one after another. The articles found
//! on a page are scraped concurrently (bounded by the executor) and all of
//! them finish before the next listing page is requested.

use crate::crawler::context::CrawlContext;
use crate::crawler::executor::Fetched;
use crate::crawler::page::{process_page, PageMode, SiteJob};
use crate::crawler::renderer::FetchResult;
use crate::extract::article_links;
use crate::state::{PaginationState, WalkDecision, WalkLimits};
use crate::url::{is_unwanted, looks_like_pagination, normalize_url, same_site, strip_fragment};
use crate::ScribeError;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

/// Where article links on a listing page come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingScope {
    /// Anchors inside the article-list container
    ArticleList,
    /// Every hyperlink on the rendered page
    WholePage,
}

/// Totals for one Blog walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlogReport {
    /// Listing pages requested
    pub pages: u32,
    /// Article tasks started
    pub articles: usize,
    /// Why the walk ended
    pub stop: WalkDecision,
}

/// Walks the listing at the site URL until a stop condition holds
pub async fn walk_blog(ctx: Arc<CrawlContext>, job: Arc<SiteJob>) -> BlogReport {
    let scope = if job.selection.article_list.is_some() {
        ListingScope::ArticleList
    } else {
        ListingScope::WholePage
    };

    let crawler = &ctx.config.crawler;
    let limits = WalkLimits {
        max_empty_pages: crawler.max_empty_pages,
        max_pages: match scope {
            ListingScope::ArticleList => crawler.max_listing_pages,
            ListingScope::WholePage => crawler.max_domain_listing_pages,
        },
    };

    let mut state = PaginationState::new(&job.site.url);
    tracing::info!(
        "Starting Blog walk of {} ({:?} pagination on '{}', {:?}, up to {} pages)",
        state.base_url(),
        state.format(),
        state.param(),
        scope,
        limits.max_pages
    );

    let mut report = BlogReport {
        pages: 0,
        articles: 0,
        stop: WalkDecision::Continue,
    };

    loop {
        let page_url = match state.current_url() {
            Ok(page_url) => page_url,
            Err(e) => {
                let error = ScribeError::PaginationConstruction {
                    base: state.base_url().to_string(),
                    page: state.page(),
                    message: e.to_string(),
                };
                ctx.report(state.base_url(), &error, "Pagination");
                report.stop = WalkDecision::Unbuildable;
                break;
            }
        };

        report.pages += 1;
        ctx.stats.listing_page();
        tracing::info!("Listing page {}: {}", state.page(), page_url);

        let articles = match ctx
            .executor
            .fetch(&page_url, scope == ListingScope::WholePage, &job.output_dir)
            .await
        {
            Ok(Fetched::Page(result)) => listing_articles(&ctx, &job, &page_url, &result, scope),
            Ok(Fetched::Binary(_)) => Vec::new(),
            Err(e) => {
                ctx.report(&page_url, &e, "Listing page");
                Vec::new()
            }
        };

        let found = articles.len();
        tracing::info!("Found {} new articles on page {}", found, state.page());
        report.articles += found;

        let mut batch = JoinSet::new();
        for article in articles {
            batch.spawn(process_page(ctx.clone(), job.clone(), article, PageMode::Article));
        }
        while let Some(joined) = batch.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Article task failed: {}", e);
            }
        }

        let decision = state.finish_page(found, limits);
        if decision.is_stop() {
            tracing::info!(
                "Blog walk of {} stopped at page {}: {}",
                state.base_url(),
                state.page(),
                decision
            );
            report.stop = decision;
            break;
        }
    }

    report
}

/// Qualifying article links on a rendered listing page, in page order
pub fn listing_articles(
    ctx: &CrawlContext,
    job: &SiteJob,
    page_url: &str,
    result: &FetchResult,
    scope: ListingScope,
) -> Vec<String> {
    let html = result.html.as_deref().unwrap_or_default();
    let landed = if result.final_url.is_empty() {
        page_url
    } else {
        result.final_url.as_str()
    };

    let candidates = match (scope, job.selection.article_list.as_ref()) {
        (ListingScope::ArticleList, Some(list)) => match Url::parse(landed) {
            Ok(base) => article_links(html, &base, list),
            Err(_) => Vec::new(),
        },
        _ => result.links.clone().unwrap_or_default(),
    };

    let own_pages: HashSet<String> = [page_url, landed, job.site.url.as_str()]
        .iter()
        .filter_map(|url| normalize_url(url).ok())
        .collect();

    let keywords = &ctx.filter().unwanted_keywords;
    let mut seen = HashSet::new();
    let mut articles = Vec::new();

    for link in candidates {
        let (fetchable, key) = match strip_fragment(&link).and_then(|f| {
            let key = normalize_url(&f)?;
            Ok((f, key))
        }) {
            Ok(pair) => pair,
            Err(e) => {
                let error = ScribeError::LinkProcessing {
                    link: link.clone(),
                    message: e.to_string(),
                };
                ctx.report(&link, &error, "Link processing");
                continue;
            }
        };

        if !same_site(&fetchable, &job.site.url)
            || is_unwanted(&fetchable, keywords)
            || looks_like_pagination(&fetchable)
            || own_pages.contains(&key)
            || ctx.is_done(&key)
        {
            continue;
        }

        if seen.insert(key) {
            articles.push(fetchable);
        }
    }

    articles
}
