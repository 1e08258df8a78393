use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Sumi-Scribe
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum number of fetches executing at once (K)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: u32,

    /// Page load timeout (milliseconds)
    #[serde(default = "default_load_timeout_ms")]
    pub load_timeout_ms: u64,

    /// Fixed wait after a page has loaded (milliseconds)
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Consecutive listing pages without articles before a blog walk stops
    #[serde(default = "default_max_empty_pages")]
    pub max_empty_pages: u32,

    /// Page cap for listings read through an article-list selector
    #[serde(default = "default_max_listing_pages")]
    pub max_listing_pages: u32,

    /// Page cap for listings that take every same-domain link
    #[serde(default = "default_max_domain_listing_pages")]
    pub max_domain_listing_pages: u32,

    /// Also strip `<aside>` elements from the content container
    #[serde(default)]
    pub strip_aside: bool,
}

impl CrawlerConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            load_timeout_ms: default_load_timeout_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            max_empty_pages: default_max_empty_pages(),
            max_listing_pages: default_max_listing_pages(),
            max_domain_listing_pages: default_max_domain_listing_pages(),
            strip_aside: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Root directory; each source gets a subdirectory
    pub output_root: PathBuf,

    /// Append-only log of visited URLs
    #[serde(default = "default_visited_file")]
    pub visited_file: PathBuf,

    /// Directory for error logs (defaults to `<output-root>/logs`)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// CSV list of target sites
    #[serde(default)]
    pub sites_file: Option<PathBuf>,

    /// Longest file name (extension included) written for a page
    #[serde(default = "default_max_filename_length")]
    pub max_filename_length: usize,
}

impl OutputConfig {
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.output_root.join("logs"))
    }
}

/// Link filtering configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FilterConfig {
    /// Links containing any of these (case-insensitive) are never followed
    #[serde(default = "default_unwanted_keywords")]
    pub unwanted_keywords: Vec<String>,

    /// URL extensions handed to the byte downloader instead of the renderer
    #[serde(default = "default_binary_extensions")]
    pub binary_extensions: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            unwanted_keywords: default_unwanted_keywords(),
            binary_extensions: default_binary_extensions(),
        }
    }
}

fn default_max_concurrency() -> u32 {
    5
}

fn default_load_timeout_ms() -> u64 {
    60_000
}

fn default_settle_delay_ms() -> u64 {
    2_000
}

fn default_max_empty_pages() -> u32 {
    3
}

fn default_max_listing_pages() -> u32 {
    200
}

fn default_max_domain_listing_pages() -> u32 {
    1000
}

fn default_visited_file() -> PathBuf {
    PathBuf::from("visited.txt")
}

fn default_max_filename_length() -> usize {
    100
}

fn default_unwanted_keywords() -> Vec<String> {
    [
        "print",
        "share",
        "login",
        "signin",
        "signup",
        "logout",
        "facebook",
        "twitter",
        "linkedin",
        "cart",
        "checkout",
        "contact",
        "business central",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_binary_extensions() -> Vec<String> {
    ["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "zip"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
