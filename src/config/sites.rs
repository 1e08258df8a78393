//! Site list loading
//!
//! Target sites come from a CSV file with the header
//! `source,type,url,param1,param2,param3`. Extra columns are ignored.

use crate::ConfigError;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::Path;

/// How a site record is processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteKind {
    /// Follow same-prefix links breadth-first
    Base,
    /// Walk a paginated article listing
    Blog,
    Stop,
    Pause,
    /// Anything else; reported and skipped
    Other(String),
}

impl SiteKind {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "Base" => Self::Base,
            "Blog" => Self::Blog,
            "stop" => Self::Stop,
            "pause" => Self::Pause,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => write!(f, "Base"),
            Self::Blog => write!(f, "Blog"),
            Self::Stop => write!(f, "stop"),
            Self::Pause => write!(f, "pause"),
            Self::Other(other) => write!(f, "{}", other),
        }
    }
}

impl<'de> Deserialize<'de> for SiteKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// One row of the site list
#[derive(Debug, Clone, Deserialize)]
pub struct SiteRecord {
    #[serde(default = "default_source")]
    pub source: String,

    #[serde(rename = "type")]
    pub kind: SiteKind,

    #[serde(default)]
    pub url: String,

    /// Container selector
    #[serde(default)]
    pub param1: String,

    /// Content-block selector
    #[serde(default)]
    pub param2: String,

    /// Article-list selector (Blog only)
    #[serde(default)]
    pub param3: String,
}

fn default_source() -> String {
    "default".to_string()
}

impl SiteRecord {
    /// Source name made safe for use as a directory name
    pub fn safe_source(&self) -> String {
        self.source.replace(['/', '\\', ' '], "_")
    }
}

/// Loads the site list from a CSV file
pub fn load_sites(path: &Path) -> Result<Vec<SiteRecord>, ConfigError> {
    let file = std::fs::File::open(path)?;
    read_sites(file)
}

/// Reads site records from any CSV source
///
/// Cells are trimmed and trailing slashes are removed from the URL.
pub fn read_sites<R: std::io::Read>(reader: R) -> Result<Vec<SiteRecord>, ConfigError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut sites = Vec::new();
    for row in csv_reader.deserialize() {
        let mut site: SiteRecord = row?;
        site.url = site.url.trim_end_matches('/').to_string();
        sites.push(site);
    }

    Ok(sites)
}
