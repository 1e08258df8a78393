//! Concurrency-bounded fetch executor
//!
//! Every page, article and listing load in a run goes through one
//! [`FetchExecutor`]. It owns K semaphore slots; a fetch holds a slot for
//! the whole render (or download), so no more than K loads are ever in
//! progress at once.

use crate::config::Config;
use crate::crawler::download::Downloader;
use crate::crawler::renderer::{FetchResult, RenderOptions, Renderer};
use crate::storage::VisitedLog;
use crate::url::is_binary;
use crate::{RenderError, ScribeError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// What a fetch produced
#[derive(Debug)]
pub enum Fetched {
    /// A rendered page
    Page(FetchResult),
    /// A binary file saved to disk; the URL is already recorded as visited
    Binary(PathBuf),
}

pub struct FetchExecutor {
    renderer: Arc<dyn Renderer>,
    downloader: Arc<dyn Downloader>,
    visited: Arc<dyn VisitedLog>,
    slots: Arc<Semaphore>,
    capacity: usize,
    timeout: Duration,
    settle_delay: Duration,
    binary_extensions: Vec<String>,
}

impl FetchExecutor {
    /// Creates an executor sized and timed from the crawler configuration
    pub fn new(
        renderer: Arc<dyn Renderer>,
        downloader: Arc<dyn Downloader>,
        visited: Arc<dyn VisitedLog>,
        config: &Config,
    ) -> Self {
        let capacity = config.crawler.max_concurrency.max(1) as usize;
        Self {
            renderer,
            downloader,
            visited,
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
            timeout: config.crawler.load_timeout(),
            settle_delay: config.crawler.settle_delay(),
            binary_extensions: config.filter.binary_extensions.clone(),
        }
    }

    /// Maximum number of concurrent fetches (K)
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots not currently held by a fetch
    pub fn available_slots(&self) -> usize {
        self.slots.available_permits()
    }

    pub fn is_binary(&self, url: &str) -> bool {
        is_binary(url, &self.binary_extensions)
    }

    /// Loads `url` while holding one of the K slots
    ///
    /// Binary URLs are downloaded into `binary_dir` and recorded as visited.
    /// Everything else is rendered; `collect_links` asks the renderer for
    /// the page's hyperlinks.
    pub async fn fetch(
        &self,
        url: &str,
        collect_links: bool,
        binary_dir: &Path,
    ) -> Result<Fetched, ScribeError> {
        let _permit = self
            .slots
            .acquire()
            .await
            .map_err(|_| RenderError::Engine {
                url: url.to_string(),
                message: "fetch executor is shut down".to_string(),
            })?;

        if self.is_binary(url) {
            tracing::debug!("Downloading binary {}", url);
            let path = self.downloader.download(url, binary_dir).await?;
            self.visited.record(url)?;
            return Ok(Fetched::Binary(path));
        }

        tracing::debug!("Rendering {}", url);
        let options = RenderOptions {
            timeout: self.timeout,
            settle_delay: self.settle_delay,
            collect_links,
        };
        let result = self.renderer.render(url, &options).await?;
        Ok(Fetched::Page(result))
    }
}
