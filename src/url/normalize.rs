use crate::UrlError;
use url::Url;

/// Normalizes a URL into the key used for every dedup decision
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or not HTTP(S)
/// 2. Remove the fragment (everything after #)
/// 3. Lowercase the whole serialized URL
/// 4. Strip trailing slashes
///
/// The result is stable under re-normalization.
///
/// # Examples
///
/// ```
/// use sumi_scribe::url::normalize_url;
///
/// let key = normalize_url("https://Example.com/Docs/#intro").unwrap();
/// assert_eq!(key, "https://example.com/docs");
/// ```
pub fn normalize_url(url_str: &str) -> Result<String, UrlError> {
    let url = parse_without_fragment(url_str)?;
    let lowered = url.as_str().to_lowercase();
    Ok(lowered.trim_end_matches('/').to_string())
}

/// Removes the fragment and trailing slashes but keeps the original case
///
/// This is the form handed to the renderer; case-sensitive servers must see
/// the path exactly as the page linked it.
pub fn strip_fragment(url_str: &str) -> Result<String, UrlError> {
    let url = parse_without_fragment(url_str)?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn parse_without_fragment(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);
    Ok(url)
}
