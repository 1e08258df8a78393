//! Structured per-failure error log
//!
//! Every per-URL failure is classified and written as one line:
//!
//! ```text
//! <timestamp> | ERROR | URL: <url> | ERROR_TYPE: <kind> | MESSAGE: <detail> | CONTEXT: <context>
//! ```
//!
//! Entries are mirrored to `tracing` so they also appear on the console.

use crate::output::traits::{OutputError, OutputResult};
use crate::ScribeError;
use chrono::{Local, Utc};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Failure category recorded in the error log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Scraping,
    PdfDownload,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "NETWORK",
            Self::Scraping => "SCRAPING",
            Self::PdfDownload => "PDF_DOWNLOAD",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats one error log line (without the trailing newline)
pub fn format_entry(
    timestamp: &str,
    url: &str,
    kind: ErrorKind,
    message: &str,
    context: &str,
) -> String {
    format!(
        "{} | ERROR | URL: {} | ERROR_TYPE: {} | MESSAGE: {} | CONTEXT: {}",
        timestamp,
        url,
        kind,
        single_line(message),
        single_line(context)
    )
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Error classifier sink shared by all crawl tasks
pub struct ErrorLog {
    path: Option<PathBuf>,
    file: Option<Mutex<File>>,
}

impl ErrorLog {
    /// Creates a fresh log file named `<project>_errors_<YYYYmmdd_HHMMSS>.log`
    /// inside `dir`
    pub fn in_dir(dir: &Path, project: &str) -> OutputResult<Self> {
        fs::create_dir_all(dir).map_err(|source| OutputError::Write {
            path: dir.display().to_string(),
            source,
        })?;
        let name = format!(
            "{}_errors_{}.log",
            project,
            Local::now().format("%Y%m%d_%H%M%S")
        );
        Self::open(&dir.join(name))
    }

    /// Opens `path` for appending
    pub fn open(path: &Path) -> OutputResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| OutputError::Write {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            file: Some(Mutex::new(file)),
        })
    }

    /// A log that only reports through `tracing`
    pub fn tracing_only() -> Self {
        Self {
            path: None,
            file: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Records one classified failure
    pub fn log(&self, url: &str, kind: ErrorKind, message: &str, context: &str) {
        tracing::error!(
            url = url,
            error_type = kind.as_str(),
            "{} ({})",
            message,
            context
        );

        let Some(file) = &self.file else {
            return;
        };

        let timestamp = Utc::now().format(TIMESTAMP_FORMAT).to_string();
        let line = format_entry(&timestamp, url, kind, message, context);

        let mut file = file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = writeln!(file, "{}", line).and_then(|_| file.flush()) {
            tracing::warn!("Could not write error log entry: {}", e);
        }
    }

    /// Records a crawl error using its own classification
    pub fn log_error(&self, url: &str, error: &ScribeError, context: &str) {
        self.log(url, error.kind(), &error.to_string(), context);
    }
}
