//! Integration tests for the crawler
//!
//! The HTTP collaborators are exercised against wiremock servers. Crawl-level
//! behavior runs against a scripted in-memory renderer so that page contents,
//! redirects and timing are fully controlled.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use sumi_scribe::config::{
    Config, CrawlerConfig, FilterConfig, OutputConfig, SiteKind, SiteRecord, UserAgentConfig,
};
use sumi_scribe::crawler::{
    hashed_binary_filename, run_site, run_sites, walk_blog, CrawlContext, Downloader,
    FetchExecutor, FetchResult, HttpDownloader, HttpRenderer, RenderOptions, Renderer, SiteJob,
    SiteOutcome,
};
use sumi_scribe::extract::ContentSelection;
use sumi_scribe::output::{site_output_dir, ErrorLog, MarkdownWriter};
use sumi_scribe::state::WalkDecision;
use sumi_scribe::storage::{VisitedLog, VisitedStore};
use sumi_scribe::{RenderError, ScribeError};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ===== Scripted collaborators =====

#[derive(Clone)]
struct ScriptedPage {
    final_url: Option<String>,
    html: String,
    links: Vec<String>,
}

/// Renderer serving canned pages, recording every call and the peak number
/// of overlapping renders
#[derive(Default)]
struct ScriptedRenderer {
    pages: HashMap<String, ScriptedPage>,
    calls: Mutex<Vec<String>>,
    delay: Duration,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedRenderer {
    fn new() -> Self {
        Self::default()
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn page(mut self, url: &str, html: &str, links: &[&str]) -> Self {
        self.pages.insert(
            url.to_string(),
            ScriptedPage {
                final_url: None,
                html: html.to_string(),
                links: links.iter().map(|l| l.to_string()).collect(),
            },
        );
        self
    }

    fn redirect(mut self, url: &str, final_url: &str, html: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            ScriptedPage {
                final_url: Some(final_url.to_string()),
                html: html.to_string(),
                links: Vec::new(),
            },
        );
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn sorted_calls(&self) -> Vec<String> {
        let mut calls = self.calls();
        calls.sort();
        calls
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    async fn render(&self, url: &str, options: &RenderOptions) -> Result<FetchResult, RenderError> {
        self.calls.lock().unwrap().push(url.to_string());

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        match self.pages.get(url) {
            Some(page) => Ok(FetchResult {
                final_url: page.final_url.clone().unwrap_or_else(|| url.to_string()),
                html: Some(page.html.clone()),
                links: options.collect_links.then(|| page.links.clone()),
            }),
            None => Err(RenderError::Navigation {
                url: url.to_string(),
                message: "HTTP 404 Not Found".to_string(),
            }),
        }
    }
}

/// Downloader that records requests instead of touching the network
#[derive(Default)]
struct RecordingDownloader {
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl Downloader for RecordingDownloader {
    async fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, ScribeError> {
        self.calls.lock().unwrap().push(url.to_string());
        Ok(dest_dir.join("downloaded.bin"))
    }
}

// ===== Fixtures =====

fn create_test_config(root: &Path, max_concurrency: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_concurrency,
            load_timeout_ms: 2_000,
            settle_delay_ms: 0,
            ..CrawlerConfig::default()
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
        },
        output: OutputConfig {
            output_root: root.join("out"),
            visited_file: root.join("visited.txt"),
            log_dir: Some(root.join("logs")),
            sites_file: None,
            max_filename_length: 100,
        },
        filter: FilterConfig::default(),
    }
}

fn create_context(
    config: Config,
    renderer: Arc<ScriptedRenderer>,
    downloader: Arc<RecordingDownloader>,
) -> Arc<CrawlContext> {
    let visited: Arc<dyn VisitedLog> =
        Arc::new(VisitedStore::open(&config.output.visited_file).unwrap());
    let executor = FetchExecutor::new(renderer, downloader, visited.clone(), &config);
    let errors = ErrorLog::in_dir(&config.output.log_dir(), "testbot").unwrap();
    Arc::new(CrawlContext::new(config, executor, visited, errors))
}

fn site(kind: SiteKind, url: &str, param1: &str, param2: &str, param3: &str) -> SiteRecord {
    SiteRecord {
        source: "test site".to_string(),
        kind,
        url: url.to_string(),
        param1: param1.to_string(),
        param2: param2.to_string(),
        param3: param3.to_string(),
    }
}

fn site_job(ctx: &CrawlContext, record: &SiteRecord) -> Arc<SiteJob> {
    let output_dir = site_output_dir(&ctx.config.output.output_root, &record.safe_source());
    let writer = MarkdownWriter::new(&output_dir, ctx.config.output.max_filename_length).unwrap();
    Arc::new(SiteJob {
        site: record.clone(),
        selection: ContentSelection::from_site(record).unwrap(),
        sink: Arc::new(writer),
        output_dir,
    })
}

fn markdown_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "md"))
            .collect(),
        Err(_) => Vec::new(),
    };
    files.sort();
    files
}

const DOCS_PAGE: &str = r#"<html><body>
    <div id="content">
      <nav><a href="/docs/menu">Menu</a></nav>
      <div class="doc-body"><h1>Docs</h1><p>Welcome to the docs.</p></div>
      <a href="/docs/a">A</a>
    </div>
</body></html>"#;

const NO_CONTAINER: &str = "<html><body><p>Nothing here</p></body></html>";

fn article(title: &str) -> String {
    format!(
        r#"<html><body><div class="entry"><div class="text"><p>{}</p></div></div></body></html>"#,
        title
    )
}

// ===== Base mode =====

#[tokio::test]
async fn test_base_crawl_end_to_end() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(
        ScriptedRenderer::new()
            .page(
                "https://a.test/docs",
                DOCS_PAGE,
                &[
                    "https://a.test/docs/a",
                    "https://a.test/docs/b#part",
                    "https://a.test/blog",
                    "https://a.test/docs/login",
                    "https://a.test/docs-old",
                ],
            )
            .page("https://a.test/docs/a", NO_CONTAINER, &[])
            .page("https://a.test/docs/b", NO_CONTAINER, &[]),
    );
    let ctx = create_context(
        create_test_config(dir.path(), 5),
        renderer.clone(),
        Arc::new(RecordingDownloader::default()),
    );

    let record = site(SiteKind::Base, "https://a.test/docs", "#content", "doc-body", "");
    let outcome = run_site(ctx.clone(), &record).await;

    assert_eq!(
        renderer.sorted_calls(),
        vec![
            "https://a.test/docs",
            "https://a.test/docs/a",
            "https://a.test/docs/b",
        ]
    );
    assert_eq!(renderer.calls()[0], "https://a.test/docs");

    let files = markdown_files(&dir.path().join("out").join("test_site"));
    assert_eq!(files.len(), 1);
    let doc = fs::read_to_string(&files[0]).unwrap();
    assert!(doc.starts_with("<!-- URL: https://a.test/docs | Scraped at: "));
    assert!(doc.contains("Welcome to the docs."));
    assert!(!doc.contains("Menu"));

    for url in ["https://a.test/docs", "https://a.test/docs/a", "https://a.test/docs/b"] {
        assert!(ctx.visited.contains(url), "{} not recorded", url);
    }

    match outcome {
        SiteOutcome::Crawled(delta) => {
            assert_eq!(delta.pages_fetched, 3);
            assert_eq!(delta.documents_written, 1);
            assert_eq!(delta.scraping_errors, 2);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_visited_urls_are_never_refetched() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("visited.txt"),
        "https://a.test/docs/a | 2024-01-01 00:00:00\n",
    )
    .unwrap();

    let renderer = Arc::new(
        ScriptedRenderer::new()
            .page(
                "https://a.test/docs",
                DOCS_PAGE,
                &["https://a.test/docs/a", "https://A.test/docs/a/", "https://a.test/docs/b"],
            )
            .page("https://a.test/docs/b", NO_CONTAINER, &[]),
    );
    let ctx = create_context(
        create_test_config(dir.path(), 5),
        renderer.clone(),
        Arc::new(RecordingDownloader::default()),
    );

    let record = site(SiteKind::Base, "https://a.test/docs", "#content", "doc-body", "");
    run_site(ctx, &record).await;

    assert_eq!(
        renderer.sorted_calls(),
        vec!["https://a.test/docs", "https://a.test/docs/b"]
    );
}

#[tokio::test]
async fn test_second_run_does_nothing() {
    let dir = TempDir::new().unwrap();
    let script = || {
        ScriptedRenderer::new()
            .page("https://a.test/docs", DOCS_PAGE, &["https://a.test/docs/a"])
            .page("https://a.test/docs/a", &article("A"), &[])
    };
    let record = site(SiteKind::Base, "https://a.test/docs", "#content", "doc-body", "");

    let first = Arc::new(script());
    let ctx = create_context(
        create_test_config(dir.path(), 2),
        first.clone(),
        Arc::new(RecordingDownloader::default()),
    );
    run_site(ctx, &record).await;
    assert_eq!(first.calls().len(), 2);

    let second = Arc::new(script());
    let ctx = create_context(
        create_test_config(dir.path(), 2),
        second.clone(),
        Arc::new(RecordingDownloader::default()),
    );
    run_site(ctx, &record).await;
    assert!(second.calls().is_empty());
}

#[tokio::test]
async fn test_redirect_onto_visited_page_is_skipped() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("visited.txt"),
        "https://a.test/docs/new | 2024-01-01 00:00:00\n",
    )
    .unwrap();

    let renderer = Arc::new(
        ScriptedRenderer::new()
            .page("https://a.test/docs", NO_CONTAINER, &["https://a.test/docs/old"])
            .redirect("https://a.test/docs/old", "https://a.test/docs/new", DOCS_PAGE),
    );
    let ctx = create_context(
        create_test_config(dir.path(), 2),
        renderer.clone(),
        Arc::new(RecordingDownloader::default()),
    );

    let record = site(SiteKind::Base, "https://a.test/docs", "#content", "doc-body", "");
    run_site(ctx.clone(), &record).await;

    assert_eq!(renderer.calls().len(), 2);
    assert!(markdown_files(&dir.path().join("out").join("test_site")).is_empty());
    assert_eq!(ctx.stats.snapshot().skipped_visited, 1);
}

#[tokio::test]
async fn test_binary_links_are_downloaded_and_recorded() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(ScriptedRenderer::new().page(
        "https://a.test/docs",
        DOCS_PAGE,
        &["https://a.test/docs/manual.pdf"],
    ));
    let downloader = Arc::new(RecordingDownloader::default());
    let ctx = create_context(
        create_test_config(dir.path(), 2),
        renderer.clone(),
        downloader.clone(),
    );

    let record = site(SiteKind::Base, "https://a.test/docs", "#content", "doc-body", "");
    run_site(ctx.clone(), &record).await;

    assert_eq!(renderer.calls(), vec!["https://a.test/docs"]);
    assert_eq!(
        downloader.calls.lock().unwrap().clone(),
        vec!["https://a.test/docs/manual.pdf"]
    );
    assert!(ctx.visited.contains("https://a.test/docs/manual.pdf"));
    assert_eq!(ctx.stats.snapshot().binaries_downloaded, 1);
}

#[tokio::test]
async fn test_failed_pages_are_logged_not_recorded() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(ScriptedRenderer::new().page(
        "https://a.test/docs",
        DOCS_PAGE,
        &["https://a.test/docs/missing"],
    ));
    let ctx = create_context(
        create_test_config(dir.path(), 2),
        renderer.clone(),
        Arc::new(RecordingDownloader::default()),
    );

    let record = site(SiteKind::Base, "https://a.test/docs", "#content", "doc-body", "");
    run_site(ctx.clone(), &record).await;

    assert!(!ctx.visited.contains("https://a.test/docs/missing"));
    assert!(ctx.is_abandoned("https://a.test/docs/missing"));
    assert_eq!(ctx.stats.snapshot().network_errors, 1);

    let log_path = ctx.errors.path().unwrap();
    let log = fs::read_to_string(log_path).unwrap();
    assert!(log.contains("| ERROR | URL: https://a.test/docs/missing | ERROR_TYPE: NETWORK |"));
}

// ===== Blog mode =====

const LISTING: &str = r#"<html><body>
    <ul class="posts">
      <li><a href="/blog/post-1">One</a></li>
      <li><a href="/blog/post-2#comments">Two</a></li>
      <li><a href="/blog/post-2">Two again</a></li>
      <li><a href="/blog?page=2">Next</a></li>
      <li><a href="https://other.test/post">Elsewhere</a></li>
    </ul>
</body></html>"#;

const EMPTY_LISTING: &str = r#"<html><body><ul class="posts"></ul></body></html>"#;

#[tokio::test]
async fn test_blog_stops_after_three_empty_pages() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(
        ScriptedRenderer::new()
            .page("https://b.test/blog", LISTING, &[])
            .page("https://b.test/blog?page=2", EMPTY_LISTING, &[])
            .page("https://b.test/blog?page=3", EMPTY_LISTING, &[])
            .page("https://b.test/blog?page=4", EMPTY_LISTING, &[])
            .page("https://b.test/blog?page=5", LISTING, &[])
            .page("https://b.test/blog/post-1", &article("First post"), &[])
            .page("https://b.test/blog/post-2", &article("Second post"), &[]),
    );
    let ctx = create_context(
        create_test_config(dir.path(), 3),
        renderer.clone(),
        Arc::new(RecordingDownloader::default()),
    );

    let record = site(SiteKind::Blog, "https://b.test/blog", "entry", "text", "posts");
    let report = walk_blog(ctx.clone(), site_job(&ctx, &record)).await;

    assert_eq!(report.stop, WalkDecision::EmptyStreak);
    assert_eq!(report.pages, 4);
    assert_eq!(report.articles, 2);

    let listings: Vec<String> = renderer
        .calls()
        .into_iter()
        .filter(|url| !url.contains("post-"))
        .collect();
    assert_eq!(
        listings,
        vec![
            "https://b.test/blog",
            "https://b.test/blog?page=2",
            "https://b.test/blog?page=3",
            "https://b.test/blog?page=4",
        ]
    );

    let files = markdown_files(&dir.path().join("out").join("test_site"));
    assert_eq!(files.len(), 2);
    assert!(ctx.visited.contains("https://b.test/blog/post-1"));
    assert!(ctx.visited.contains("https://b.test/blog/post-2"));
    assert!(!ctx.visited.contains("https://b.test/blog"));
}

#[tokio::test]
async fn test_blog_articles_finish_before_next_page() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(
        ScriptedRenderer::new()
            .with_delay(Duration::from_millis(20))
            .page("https://b.test/blog", LISTING, &[])
            .page("https://b.test/blog/post-1", &article("First post"), &[])
            .page("https://b.test/blog/post-2", &article("Second post"), &[]),
    );
    let ctx = create_context(
        create_test_config(dir.path(), 3),
        renderer.clone(),
        Arc::new(RecordingDownloader::default()),
    );

    let record = site(SiteKind::Blog, "https://b.test/blog", "entry", "text", "posts");
    run_site(ctx, &record).await;

    let calls = renderer.calls();
    let page_two = calls
        .iter()
        .position(|url| url == "https://b.test/blog?page=2")
        .unwrap();
    for post in ["https://b.test/blog/post-1", "https://b.test/blog/post-2"] {
        let at = calls.iter().position(|url| url == post).unwrap();
        assert!(at < page_two, "{} requested after page 2", post);
    }
}

#[tokio::test]
async fn test_blog_stops_when_first_page_is_empty() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(
        ScriptedRenderer::new()
            .page("https://b.test/blog", EMPTY_LISTING, &[])
            .page("https://b.test/blog?page=2", LISTING, &[]),
    );
    let ctx = create_context(
        create_test_config(dir.path(), 3),
        renderer.clone(),
        Arc::new(RecordingDownloader::default()),
    );

    let record = site(SiteKind::Blog, "https://b.test/blog", "entry", "text", "posts");
    let report = walk_blog(ctx.clone(), site_job(&ctx, &record)).await;

    assert_eq!(report.stop, WalkDecision::FirstPageEmpty);
    assert_eq!(report.pages, 1);
    assert_eq!(renderer.calls(), vec!["https://b.test/blog"]);
}

#[tokio::test]
async fn test_blog_stops_at_page_cap() {
    let dir = TempDir::new().unwrap();
    let listing = |n: u32| {
        format!(
            r#"<html><body><ul class="posts"><li><a href="/blog/post-{}">Post</a></li></ul></body></html>"#,
            n
        )
    };
    let renderer = Arc::new(
        ScriptedRenderer::new()
            .page("https://b.test/blog", &listing(1), &[])
            .page("https://b.test/blog?page=2", &listing(2), &[])
            .page("https://b.test/blog?page=3", &listing(3), &[])
            .page("https://b.test/blog/post-1", &article("One"), &[])
            .page("https://b.test/blog/post-2", &article("Two"), &[])
            .page("https://b.test/blog/post-3", &article("Three"), &[]),
    );
    let mut config = create_test_config(dir.path(), 3);
    config.crawler.max_listing_pages = 2;
    let ctx = create_context(
        config,
        renderer.clone(),
        Arc::new(RecordingDownloader::default()),
    );

    let record = site(SiteKind::Blog, "https://b.test/blog", "entry", "text", "posts");
    let report = walk_blog(ctx.clone(), site_job(&ctx, &record)).await;

    assert_eq!(report.stop, WalkDecision::PageCap);
    assert_eq!(report.pages, 2);
    assert_eq!(report.articles, 2);
    let calls = renderer.calls();
    assert!(!calls.contains(&"https://b.test/blog?page=3".to_string()));
    assert!(!calls.contains(&"https://b.test/blog/post-3".to_string()));
}

#[tokio::test]
async fn test_blog_whole_page_scope_uses_rendered_links() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(
        ScriptedRenderer::new()
            .page(
                "https://www.c.test/news/page/1/",
                EMPTY_LISTING,
                &[
                    "https://c.test/news/story",
                    "https://www.c.test/news/page/2/",
                    "https://c.test/share/story",
                    "https://other.test/story",
                ],
            )
            .page("https://c.test/news/story", &article("Story"), &[]),
    );
    let ctx = create_context(
        create_test_config(dir.path(), 3),
        renderer.clone(),
        Arc::new(RecordingDownloader::default()),
    );

    let record = site(SiteKind::Blog, "https://www.c.test/news/page/1/", "entry", "", "");
    run_site(ctx, &record).await;

    let calls = renderer.calls();
    assert!(calls.contains(&"https://c.test/news/story".to_string()));
    assert!(!calls.contains(&"https://c.test/share/story".to_string()));
    assert!(!calls.contains(&"https://other.test/story".to_string()));
    assert!(calls.contains(&"https://www.c.test/news/page/2/".to_string()));
}

// ===== Concurrency =====

#[tokio::test]
async fn test_concurrency_bound_holds() {
    let dir = TempDir::new().unwrap();
    let posts: Vec<String> = (1..=12)
        .map(|i| format!("https://d.test/blog/post-{}", i))
        .collect();
    let post_refs: Vec<&str> = posts.iter().map(String::as_str).collect();

    let mut script = ScriptedRenderer::new()
        .with_delay(Duration::from_millis(30))
        .page("https://d.test/blog", EMPTY_LISTING, &post_refs);
    for post in &posts {
        script = script.page(post, &article(post), &[]);
    }
    let renderer = Arc::new(script);

    let ctx = create_context(
        create_test_config(dir.path(), 3),
        renderer.clone(),
        Arc::new(RecordingDownloader::default()),
    );

    let record = site(SiteKind::Blog, "https://d.test/blog", "entry", "text", "");
    run_site(ctx.clone(), &record).await;

    assert!(renderer.peak() <= 3, "peak concurrency was {}", renderer.peak());
    assert!(renderer.peak() >= 2);
    assert_eq!(ctx.stats.snapshot().documents_written, 12);
    assert_eq!(ctx.executor.available_slots(), 3);
}

// ===== Dispatch =====

#[tokio::test]
async fn test_dispatch_skips_control_and_unknown_records() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(ScriptedRenderer::new());
    let ctx = create_context(
        create_test_config(dir.path(), 2),
        renderer.clone(),
        Arc::new(RecordingDownloader::default()),
    );

    let sites = vec![
        site(SiteKind::Stop, "", "", "", ""),
        site(SiteKind::Pause, "", "", "", ""),
        site(SiteKind::Other("Forum".to_string()), "https://e.test", "x", "", ""),
        site(SiteKind::Base, "https://e.test/docs", "", "", ""),
    ];
    let outcomes = run_sites(ctx, &sites).await;

    assert_eq!(outcomes[0], SiteOutcome::Halted);
    assert_eq!(outcomes[1], SiteOutcome::Halted);
    assert!(matches!(outcomes[2], SiteOutcome::Skipped(_)));
    assert!(matches!(outcomes[3], SiteOutcome::Skipped(_)));
    assert!(renderer.calls().is_empty());
}

// ===== HTTP collaborators =====

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
    }
}

fn render_options(collect_links: bool) -> RenderOptions {
    RenderOptions {
        timeout: Duration::from_secs(5),
        settle_delay: Duration::ZERO,
        collect_links,
    }
}

#[tokio::test]
async fn test_http_renderer_follows_redirects_and_collects_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/landing"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r##"<html><body>
                    <a href="/next">Next</a>
                    <a href="mailto:someone@example.com">Mail</a>
                    <a href="#top">Top</a>
                    </body></html>"##,
                )
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let renderer = HttpRenderer::from_config(&user_agent()).unwrap();
    let result = renderer
        .render(&format!("{}/start", base_url), &render_options(true))
        .await
        .unwrap();

    assert_eq!(result.final_url, format!("{}/landing", base_url));
    assert!(result.html.unwrap().contains("Next"));
    assert_eq!(result.links.unwrap(), vec![format!("{}/next", base_url)]);
}

#[tokio::test]
async fn test_http_renderer_reports_http_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let renderer = HttpRenderer::from_config(&user_agent()).unwrap();
    let err = renderer
        .render(&format!("{}/missing", mock_server.uri()), &render_options(false))
        .await
        .unwrap_err();

    assert!(matches!(err, RenderError::Navigation { .. }));
}

#[tokio::test]
async fn test_http_renderer_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let renderer = HttpRenderer::from_config(&user_agent()).unwrap();
    let options = RenderOptions {
        timeout: Duration::from_millis(200),
        ..render_options(false)
    };
    let err = renderer
        .render(&format!("{}/slow", mock_server.uri()), &options)
        .await
        .unwrap_err();

    assert!(matches!(err, RenderError::Timeout { timeout_ms: 200, .. }));
}

#[tokio::test]
async fn test_http_downloader_saves_file() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/files/guide.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4 test".to_vec()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/gone.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = sumi_scribe::crawler::build_http_client(&user_agent()).unwrap();
    let downloader = HttpDownloader::new(client, Duration::from_secs(5));

    let saved = downloader
        .download(&format!("{}/files/guide.pdf", mock_server.uri()), dir.path())
        .await
        .unwrap();
    assert_eq!(saved, dir.path().join("guide.pdf"));
    assert_eq!(fs::read(&saved).unwrap(), b"%PDF-1.4 test");

    let err = downloader
        .download(&format!("{}/files/gone.pdf", mock_server.uri()), dir.path())
        .await
        .unwrap_err();
    assert!(matches!(err, ScribeError::BinaryTransfer { .. }));
}

#[tokio::test]
async fn test_http_downloader_keeps_same_named_files_apart() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    for year in ["2023", "2024"] {
        Mock::given(method("GET"))
            .and(path(format!("/{}/report.pdf", year)))
            .respond_with(
                ResponseTemplate::new(200).set_body_bytes(format!("REPORT-{}", year).into_bytes()),
            )
            .mount(&mock_server)
            .await;
    }

    let client = sumi_scribe::crawler::build_http_client(&user_agent()).unwrap();
    let downloader = HttpDownloader::new(client, Duration::from_secs(5));

    let first_url = format!("{}/2023/report.pdf", mock_server.uri());
    let second_url = format!("{}/2024/report.pdf", mock_server.uri());
    let first = downloader.download(&first_url, dir.path()).await.unwrap();
    let second = downloader.download(&second_url, dir.path()).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(first, dir.path().join("report.pdf"));
    assert_eq!(second, dir.path().join(hashed_binary_filename(&second_url)));
    assert_eq!(fs::read_to_string(&first).unwrap(), "REPORT-2023");
    assert_eq!(fs::read_to_string(&second).unwrap(), "REPORT-2024");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}
