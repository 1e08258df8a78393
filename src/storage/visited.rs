//! Append-only visited log backed by a plain text file
//!
//! Each line holds `<normalized url> | <UTC timestamp>`. The whole file is
//! read once at startup; afterwards every newly processed URL is appended and
//! flushed immediately so an interrupted run loses nothing it finished.

use crate::storage::traits::{StorageError, StorageResult, VisitedLog};
use crate::url::normalize_url;
use chrono::Utc;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Separator between the URL and the timestamp on each line
const FIELD_SEPARATOR: &str = " | ";

/// Timestamp layout written after each URL
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

struct Inner {
    seen: HashSet<String>,
    file: File,
}

/// File-backed [`VisitedLog`]
pub struct VisitedStore {
    path: PathBuf,
    inner: Mutex<Inner>,
}

impl VisitedStore {
    /// Opens (or creates) the visited log at `path` and loads its entries
    ///
    /// Missing parent directories are created. Blank lines are ignored, and
    /// lines without a timestamp are taken whole as the URL. Loaded URLs are
    /// normalized, so hand-edited entries match like recorded ones.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let io_err = |source| StorageError::Io {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let mut seen = HashSet::new();
        if path.exists() {
            let reader = BufReader::new(File::open(path).map_err(io_err)?);
            for line in reader.lines() {
                let line = line.map_err(io_err)?;
                let url = line
                    .split_once(FIELD_SEPARATOR)
                    .map(|(url, _)| url)
                    .unwrap_or(&line)
                    .trim();
                if !url.is_empty() {
                    seen.insert(Self::key(url));
                }
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(io_err)?;

        tracing::debug!("Loaded {} visited URLs from {}", seen.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            inner: Mutex::new(Inner { seen, file }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicked writer leaves the set consistent; keep going.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn key(url: &str) -> String {
        normalize_url(url).unwrap_or_else(|_| url.trim().to_lowercase())
    }
}

impl VisitedLog for VisitedStore {
    fn contains(&self, url: &str) -> bool {
        let key = Self::key(url);
        self.lock().seen.contains(&key)
    }

    fn record(&self, url: &str) -> StorageResult<bool> {
        let key = Self::key(url);
        if key.is_empty() {
            return Err(StorageError::InvalidKey(
                url.to_string(),
                "empty URL".to_string(),
            ));
        }

        let mut inner = self.lock();
        if !inner.seen.insert(key.clone()) {
            return Ok(false);
        }

        let line = format!(
            "{}{}{}\n",
            key,
            FIELD_SEPARATOR,
            Utc::now().format(TIMESTAMP_FORMAT)
        );
        let written = inner
            .file
            .write_all(line.as_bytes())
            .and_then(|_| inner.file.flush());

        if let Err(source) = written {
            inner.seen.remove(&key);
            return Err(StorageError::Io {
                path: self.path.display().to_string(),
                source,
            });
        }

        Ok(true)
    }

    fn len(&self) -> usize {
        self.lock().seen.len()
    }
}
