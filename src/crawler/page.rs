//! Per-page work shared by both traversal strategies
//!
//! A page task fetches one URL, records it as visited, extracts its content
//! into a Markdown document and hands back the links it found. Every failure
//! is classified and logged here; the caller only sees an empty link list.

use crate::config::SiteRecord;
use crate::crawler::context::CrawlContext;
use crate::crawler::executor::Fetched;
use crate::extract::{extract, ContentSelection};
use crate::output::DocumentSink;
use crate::url::normalize_url;
use crate::{ExtractError, ScribeError};
use std::path::PathBuf;
use std::sync::Arc;

/// Context written to the error log for binary transfer failures
const BINARY_FAILURE_CONTEXT: &str = "PDF download failed";

/// Everything a page task needs to know about its site
pub struct SiteJob {
    pub site: SiteRecord,
    pub selection: ContentSelection,
    pub sink: Arc<dyn DocumentSink>,
    pub output_dir: PathBuf,
}

/// How a page is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    /// Base crawl: collect links, skip redirects onto visited pages
    Crawl,
    /// Blog article: content only
    Article,
}

impl PageMode {
    fn context(&self) -> &'static str {
        match self {
            Self::Crawl => "Base crawl",
            Self::Article => "Blog article",
        }
    }
}

/// Processes one page and returns the hyperlinks it discovered
pub async fn process_page(
    ctx: Arc<CrawlContext>,
    job: Arc<SiteJob>,
    url: String,
    mode: PageMode,
) -> Vec<String> {
    let collect_links = mode == PageMode::Crawl;

    let fetched = match ctx.executor.fetch(&url, collect_links, &job.output_dir).await {
        Ok(fetched) => fetched,
        Err(e) => {
            let context = match &e {
                ScribeError::BinaryTransfer { .. } => BINARY_FAILURE_CONTEXT,
                _ => mode.context(),
            };
            ctx.fail(&url, &e, context);
            return Vec::new();
        }
    };

    let result = match fetched {
        Fetched::Binary(path) => {
            tracing::debug!("Saved {} to {}", url, path.display());
            ctx.stats.binary_downloaded();
            return Vec::new();
        }
        Fetched::Page(result) => result,
    };

    ctx.stats.page_fetched();
    ctx.mark_visited(&url);

    if mode == PageMode::Crawl && redirected_to_visited(&ctx, &url, &result.final_url) {
        tracing::info!("{} redirected to already visited {}", url, result.final_url);
        ctx.stats.skipped_visited();
        return Vec::new();
    }

    let final_url = if result.final_url.is_empty() {
        url.clone()
    } else {
        result.final_url.clone()
    };

    let extracted = match result.html.as_deref() {
        Some(html) => extract(html, &final_url, &job.selection, ctx.extract_options())
            .map_err(ScribeError::from),
        None => Err(ScribeError::from(ExtractError::MissingContent {
            selector: job.selection.container.raw().to_string(),
        })),
    };

    match extracted {
        Ok(markdown) => match job.sink.write_document(&final_url, &markdown) {
            Ok(path) => {
                ctx.stats.document_written();
                tracing::info!("Saved {} -> {}", final_url, path.display());
                if final_url != url {
                    ctx.mark_visited(&final_url);
                }
            }
            Err(e) => ctx.report(&url, &ScribeError::from(e), mode.context()),
        },
        Err(e) => ctx.report(&url, &e, mode.context()),
    }

    result.links.unwrap_or_default()
}

/// Checks whether a render landed on a different page that is already done
fn redirected_to_visited(ctx: &CrawlContext, requested: &str, final_url: &str) -> bool {
    if final_url.is_empty() {
        return false;
    }
    match (normalize_url(requested), normalize_url(final_url)) {
        (Ok(requested), Ok(landed)) => requested != landed && ctx.visited.contains(&landed),
        _ => false,
    }
}
