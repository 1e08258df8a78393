use crate::config::sites::{SiteKind, SiteRecord};
use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrency < 1 || config.max_concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and 100, got {}",
            config.max_concurrency
        )));
    }

    if config.load_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "load_timeout_ms must be >= 100ms, got {}ms",
            config.load_timeout_ms
        )));
    }

    if config.max_empty_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_empty_pages must be >= 1, got {}",
            config.max_empty_pages
        )));
    }

    if config.max_listing_pages < 1 || config.max_domain_listing_pages < 1 {
        return Err(ConfigError::Validation(
            "listing page caps must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.output_root.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output_root cannot be empty".to_string(),
        ));
    }

    if config.visited_file.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "visited_file cannot be empty".to_string(),
        ));
    }

    // Room for a readable stem plus the `_` + 8 hex hash suffix
    if config.max_filename_length < 16 {
        return Err(ConfigError::Validation(format!(
            "max_filename_length must be >= 16, got {}",
            config.max_filename_length
        )));
    }

    Ok(())
}

/// Validates a single site record
///
/// Only crawlable kinds are checked; `stop`, `pause` and unknown types are
/// accepted here and handled by the dispatcher.
pub fn validate_site(site: &SiteRecord) -> Result<(), ConfigError> {
    if !matches!(site.kind, SiteKind::Base | SiteKind::Blog) {
        return Ok(());
    }

    let url = Url::parse(&site.url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid site URL '{}': {}", site.url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Site URL '{}' must use HTTP or HTTPS",
            site.url
        )));
    }

    if site.param1.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "Site '{}' needs a container selector in param1",
            site.source
        )));
    }

    Ok(())
}
