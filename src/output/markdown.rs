//! Markdown document writer
//!
//! Every extracted page becomes one `.md` file inside the site's output
//! directory. File names come from the page URL: the last one or two path
//! segments plus any query, reduced to a path-safe alphabet and bounded in
//! length. Names that are too long, or that would collide with a document
//! from a different URL, carry a short SHA-256 suffix of the full URL.

use crate::output::traits::{DocumentSink, OutputError, OutputResult};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use url::Url;

const EXTENSION: &str = ".md";

/// Hex digits of the URL hash used as a disambiguating suffix
const HASH_LEN: usize = 8;

/// Prefix of the provenance comment at the top of every document
pub const HEADER_PREFIX: &str = "<!-- URL: ";

/// Builds the file name for a page URL
///
/// The result is deterministic, contains only ASCII letters, digits, `-`
/// and `_` before the `.md` extension, and is never longer than `max_len`.
///
/// # Examples
///
/// ```
/// use sumi_scribe::output::sanitize_filename;
///
/// assert_eq!(
///     sanitize_filename("https://a.test/docs/getting-started", 100),
///     "docs_getting-started.md"
/// );
/// assert_eq!(sanitize_filename("https://a.test/", 100), "a_test.md");
/// ```
pub fn sanitize_filename(url: &str, max_len: usize) -> String {
    let stem = filename_stem(url);
    let budget = max_len.saturating_sub(EXTENSION.len());

    if stem.len() <= budget {
        format!("{}{}", stem, EXTENSION)
    } else {
        hashed_filename(url, max_len)
    }
}

/// Builds the hash-suffixed file name for a page URL
///
/// Used directly when the plain name is taken by a different URL.
pub fn hashed_filename(url: &str, max_len: usize) -> String {
    let stem = filename_stem(url);
    let suffix = url_hash(url);
    let budget = max_len
        .saturating_sub(EXTENSION.len())
        .saturating_sub(HASH_LEN + 1);

    let prefix = &stem[..stem.len().min(budget)];
    format!("{}_{}{}", prefix.trim_end_matches('_'), suffix, EXTENSION)
}

/// Short hex digest of a URL used to tell same-named files apart
pub(crate) fn url_hash(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    hex::encode(digest)[..HASH_LEN].to_string()
}

fn filename_stem(url: &str) -> String {
    let raw = match Url::parse(url.trim()) {
        Ok(parsed) => {
            let segments: Vec<&str> = parsed
                .path_segments()
                .map(|s| s.filter(|seg| !seg.is_empty()).collect())
                .unwrap_or_default();

            let tail = segments.len().saturating_sub(2);
            let mut name = segments[tail..].join("_");
            if name.is_empty() {
                name = parsed.host_str().unwrap_or_default().to_string();
            }
            if let Some(query) = parsed.query().filter(|q| !q.is_empty()) {
                name.push('_');
                name.push_str(query);
            }
            name
        }
        Err(_) => url.trim().to_string(),
    };

    let mut cleaned = String::with_capacity(raw.len());
    for c in raw.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            c
        } else {
            '_'
        };
        if c == '_' && cleaned.ends_with('_') {
            continue;
        }
        cleaned.push(c);
    }

    let cleaned = cleaned.trim_matches('_');
    if cleaned.is_empty() {
        "index".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Reads the source URL recorded in an existing document's header
fn recorded_url(path: &Path) -> Option<String> {
    let file = fs::File::open(path).ok()?;
    let mut first = String::new();
    BufReader::new(file).read_line(&mut first).ok()?;
    let rest = first.trim().strip_prefix(HEADER_PREFIX)?;
    let (url, _) = rest.split_once(" | ")?;
    Some(url.to_string())
}

/// Writes documents for one site into a single directory
pub struct MarkdownWriter {
    dir: PathBuf,
    max_len: usize,
    claimed: Mutex<HashMap<String, String>>,
}

impl MarkdownWriter {
    /// Creates a writer for `dir`, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>, max_len: usize) -> OutputResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| OutputError::Write {
            path: dir.display().to_string(),
            source,
        })?;
        Ok(Self {
            dir,
            max_len,
            claimed: Mutex::new(HashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Picks the file name for `url`, switching to the hashed name when the
    /// plain one belongs to another URL
    fn claim(&self, url: &str) -> String {
        let mut claimed = self
            .claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let plain = sanitize_filename(url, self.max_len);
        let taken_this_run = claimed.get(&plain).is_some_and(|owner| owner != url);
        let taken_on_disk = !taken_this_run
            && !claimed.contains_key(&plain)
            && recorded_url(&self.dir.join(&plain)).is_some_and(|owner| owner != url);

        let name = if taken_this_run || taken_on_disk {
            hashed_filename(url, self.max_len)
        } else {
            plain
        };

        claimed.insert(name.clone(), url.to_string());
        name
    }
}

impl DocumentSink for MarkdownWriter {
    fn write_document(&self, final_url: &str, markdown: &str) -> OutputResult<PathBuf> {
        let path = self.dir.join(self.claim(final_url));
        fs::write(&path, markdown).map_err(|source| OutputError::Write {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!("Wrote {}", path.display());
        Ok(path)
    }
}
