//! Binary file download

use crate::output::url_hash;
use crate::ScribeError;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// Saves the raw bytes behind a URL
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Downloads `url` into `dest_dir` and returns the written path
    async fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, ScribeError>;
}

/// File name for a downloaded binary: the URL's last path segment, made
/// path-safe
pub fn binary_filename(url: &str) -> String {
    let segment = Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|segment| !segment.is_empty())
        .unwrap_or_else(|| "download".to_string());

    segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// File name for a binary whose plain name belongs to another URL:
/// `<stem>_<8 hex>.<ext>`
pub fn hashed_binary_filename(url: &str) -> String {
    let plain = binary_filename(url);
    let suffix = url_hash(url);
    match plain.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, suffix, ext),
        _ => format!("{}_{}", plain, suffix),
    }
}

/// Downloader backed by `reqwest`
pub struct HttpDownloader {
    client: Client,
    timeout: Duration,
    /// Destination path to the URL that owns it in this run
    claimed: Mutex<HashMap<PathBuf, String>>,
}

impl HttpDownloader {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            claimed: Mutex::new(HashMap::new()),
        }
    }

    /// Picks the destination for `url` and claims it
    ///
    /// The plain name is used unless another URL claimed it this run or a
    /// file of that name already exists, in which case the hashed name is
    /// used.
    fn claim_path(&self, url: &str, dest_dir: &Path) -> PathBuf {
        let plain = dest_dir.join(binary_filename(url));
        let mut claimed = self
            .claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let taken = match claimed.get(&plain) {
            Some(owner) => owner != url,
            None => plain.exists(),
        };
        let path = if taken {
            dest_dir.join(hashed_binary_filename(url))
        } else {
            plain
        };

        claimed.insert(path.clone(), url.to_string());
        path
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, ScribeError> {
        let failed = |message: String| ScribeError::BinaryTransfer {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| failed(e.to_string()))?;

        let bytes = response.bytes().await.map_err(|e| failed(e.to_string()))?;

        tokio::fs::create_dir_all(dest_dir)
            .await
            .map_err(|e| failed(format!("cannot create {}: {}", dest_dir.display(), e)))?;

        let path = self.claim_path(url, dest_dir);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| failed(format!("cannot write {}: {}", path.display(), e)))?;

        tracing::info!("Downloaded {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}
