use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host (which shouldn't happen for valid HTTP(S) URLs), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_scribe::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the network domain of a URL string with any `www.` prefix removed
///
/// Two URLs belong to the same site when their site hosts are equal.
pub fn site_host(url_str: &str) -> Option<String> {
    let url = Url::parse(url_str.trim()).ok()?;
    let domain = extract_domain(&url)?;
    Some(match domain.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => domain,
    })
}

/// Checks whether two URLs share a network domain
pub fn same_site(a: &str, b: &str) -> bool {
    match (site_host(a), site_host(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
