//! Link filters shared by both traversal strategies

use url::Url;

/// Checks if a URL contains any unwanted keyword (case-insensitive)
///
/// # Examples
///
/// ```
/// use sumi_scribe::url::is_unwanted;
///
/// let keywords = vec!["login".to_string(), "Business Central".to_string()];
/// assert!(is_unwanted("https://a.test/Login?next=/", &keywords));
/// assert!(is_unwanted("https://a.test/business central/intro", &keywords));
/// assert!(!is_unwanted("https://a.test/docs", &keywords));
/// ```
pub fn is_unwanted(url: &str, keywords: &[String]) -> bool {
    let lowered = url.to_lowercase();
    keywords
        .iter()
        .filter(|k| !k.is_empty())
        .any(|k| lowered.contains(&k.to_lowercase()))
}

/// Checks if a normalized URL lies under a normalized base prefix
///
/// The match respects path boundaries: `https://a.test/docs` covers
/// `https://a.test/docs/intro` and `https://a.test/docs?v=2`, but not
/// `https://a.test/docs-old`. A base that already carries a query covers
/// links that extend that query with more parameters.
pub fn is_within_prefix(candidate: &str, base: &str) -> bool {
    match candidate.strip_prefix(base) {
        Some("") => true,
        Some(rest) if base.contains('?') => rest.starts_with('&'),
        Some(rest) => rest.starts_with('/') || rest.starts_with('?'),
        None => false,
    }
}

/// Checks if a URL points at binary content by its path extension
pub fn is_binary(url: &str, extensions: &[String]) -> bool {
    let path = match Url::parse(url.trim()) {
        Ok(parsed) => parsed.path().to_lowercase(),
        Err(_) => return false,
    };

    match path.rsplit_once('.') {
        Some((_, ext)) if !ext.contains('/') => {
            extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
        }
        _ => false,
    }
}
