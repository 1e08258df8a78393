//! Shared state for one run
//!
//! A [`CrawlContext`] is created once and handed to every task as an
//! `Arc`. The visited log and the abandoned set are the only pieces mutated
//! concurrently, and both synchronize internally.

use crate::config::{Config, FilterConfig};
use crate::crawler::download::HttpDownloader;
use crate::crawler::executor::FetchExecutor;
use crate::crawler::renderer::{build_http_client, HttpRenderer};
use crate::extract::ExtractOptions;
use crate::output::{ErrorLog, RunStats};
use crate::storage::{open_visited, VisitedLog};
use crate::url::normalize_url;
use crate::ScribeError;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

pub struct CrawlContext {
    pub config: Config,
    pub executor: FetchExecutor,
    pub visited: Arc<dyn VisitedLog>,
    pub errors: ErrorLog,
    pub stats: RunStats,
    abandoned: Mutex<HashSet<String>>,
}

impl CrawlContext {
    pub fn new(
        config: Config,
        executor: FetchExecutor,
        visited: Arc<dyn VisitedLog>,
        errors: ErrorLog,
    ) -> Self {
        Self {
            config,
            executor,
            visited,
            errors,
            stats: RunStats::new(),
            abandoned: Mutex::new(HashSet::new()),
        }
    }

    /// Wires up the production collaborators for `config`
    ///
    /// Opens the visited log, creates a fresh error log in the log
    /// directory, and builds the HTTP renderer and downloader.
    pub fn from_config(config: Config) -> Result<Self, ScribeError> {
        let visited: Arc<dyn VisitedLog> = Arc::new(open_visited(&config.output.visited_file)?);
        tracing::info!(
            "Visited log {} holds {} URLs",
            config.output.visited_file.display(),
            visited.len()
        );

        let project = config.user_agent.crawler_name.to_lowercase();
        let errors = ErrorLog::in_dir(&config.output.log_dir(), &project)?;
        if let Some(path) = errors.path() {
            tracing::info!("Writing error log to {}", path.display());
        }

        let client = build_http_client(&config.user_agent)?;
        let renderer = Arc::new(HttpRenderer::new(client.clone()));
        let downloader = Arc::new(HttpDownloader::new(client, config.crawler.load_timeout()));
        let executor = FetchExecutor::new(renderer, downloader, visited.clone(), &config);

        Ok(Self::new(config, executor, visited, errors))
    }

    pub fn filter(&self) -> &FilterConfig {
        &self.config.filter
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            strip_aside: self.config.crawler.strip_aside,
        }
    }

    fn abandoned(&self) -> MutexGuard<'_, HashSet<String>> {
        self.abandoned
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Checks whether a URL failed earlier in this run
    pub fn is_abandoned(&self, url: &str) -> bool {
        match normalize_url(url) {
            Ok(key) => self.abandoned().contains(&key),
            Err(_) => false,
        }
    }

    /// Checks whether a URL needs no further work: visited in any run or
    /// abandoned in this one
    pub fn is_done(&self, url: &str) -> bool {
        self.visited.contains(url) || self.is_abandoned(url)
    }

    /// Marks a URL as processed
    pub fn mark_visited(&self, url: &str) {
        if let Err(e) = self.visited.record(url) {
            self.report(url, &ScribeError::from(e), "Visited log");
        }
    }

    /// Logs and counts a failure without abandoning the URL
    pub fn report(&self, url: &str, error: &ScribeError, context: &str) {
        self.stats.failure(error.kind());
        self.errors.log_error(url, error, context);
    }

    /// Logs and counts a failure and abandons the URL for the rest of the run
    pub fn fail(&self, url: &str, error: &ScribeError, context: &str) {
        self.report(url, error, context);
        if let Ok(key) = normalize_url(url) {
            self.abandoned().insert(key);
        }
    }
}
