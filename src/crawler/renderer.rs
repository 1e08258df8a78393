//! Page rendering
//!
//! The crawl core only needs three things from a page load: where it ended
//! up after redirects, its HTML, and optionally the hyperlinks on it. The
//! [`Renderer`] trait captures exactly that. [`HttpRenderer`] is the stock
//! implementation backed by `reqwest`.

use crate::config::UserAgentConfig;
use crate::extract::page_links;
use crate::RenderError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Redirect hops followed before a load is treated as failed
const MAX_REDIRECTS: usize = 10;

/// Per-load settings handed to a renderer
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Upper bound on the whole page load
    pub timeout: Duration,
    /// Pause after the load completes before the page is read
    pub settle_delay: Duration,
    /// Whether the result should carry the page's hyperlinks
    pub collect_links: bool,
}

/// Result of rendering a URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResult {
    /// URL after all redirects
    pub final_url: String,
    /// Rendered HTML; absent for binary content
    pub html: Option<String>,
    /// Absolute hyperlinks on the page, when requested
    pub links: Option<Vec<String>>,
}

/// Loads a URL and returns its rendered form
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, url: &str, options: &RenderOptions) -> Result<FetchResult, RenderError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use sumi_scribe::config::UserAgentConfig;
/// use sumi_scribe::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "SumiScribe".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Renderer that performs a plain HTTP GET
///
/// No script runs; the HTML is what the server sent. Links are read from the
/// returned document.
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn render(&self, url: &str, options: &RenderOptions) -> Result<FetchResult, RenderError> {
        let response = self
            .client
            .get(url)
            .timeout(options.timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, options.timeout, e))?;

        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let html = response.text().await.map_err(|e| {
            if e.is_timeout() {
                classify_error(url, options.timeout, e)
            } else {
                RenderError::Engine {
                    url: url.to_string(),
                    message: format!("Failed to read body: {}", e),
                }
            }
        })?;

        if !options.settle_delay.is_zero() {
            tokio::time::sleep(options.settle_delay).await;
        }

        let links = options.collect_links.then(|| match Url::parse(&final_url) {
            Ok(base) => page_links(&html, &base),
            Err(_) => Vec::new(),
        });

        tracing::trace!("Rendered {} ({} bytes)", final_url, html.len());

        Ok(FetchResult {
            final_url,
            html: Some(html),
            links,
        })
    }
}

fn classify_error(url: &str, timeout: Duration, e: reqwest::Error) -> RenderError {
    if e.is_timeout() {
        RenderError::Timeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }
    } else if e.is_connect() {
        RenderError::Navigation {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    } else if e.is_redirect() {
        RenderError::Navigation {
            url: url.to_string(),
            message: format!("Redirect error: {}", e),
        }
    } else {
        RenderError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}
