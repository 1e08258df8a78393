//! Listing-page URL construction
//!
//! A paginated listing is numbered either through a query parameter
//! (`?page=2`) or a path segment (`/page/2/`). The scheme is detected once
//! from the base URL and then used to build every later page URL. Building
//! works on the URL text so that everything outside the page marker is kept
//! exactly as written.

use crate::UrlError;
use url::Url;

/// Query parameter names recognized as page markers
const QUERY_PAGE_PARAMS: &[&str] = &["page", "paged", "pg"];

/// Path segment that precedes a page number
const PATH_PAGE_SEGMENT: &str = "page";

/// How a listing encodes its page number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationFormat {
    QueryParameter,
    PathSegment,
}

/// Detected pagination scheme: the format plus the marker name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationScheme {
    pub format: PaginationFormat,
    pub param: String,
}

impl PaginationScheme {
    /// Inspects a base URL and infers its numbering scheme
    ///
    /// A query-style marker wins over a path-style one; without either the
    /// scheme defaults to a `page` query parameter.
    pub fn detect(base_url: &str) -> Self {
        let (_, path, rest) = split_url(base_url);

        if let Some(name) = query_marker(rest) {
            return Self {
                format: PaginationFormat::QueryParameter,
                param: name.to_string(),
            };
        }

        if path_marker_index(path).is_some() {
            return Self {
                format: PaginationFormat::PathSegment,
                param: PATH_PAGE_SEGMENT.to_string(),
            };
        }

        Self {
            format: PaginationFormat::QueryParameter,
            param: QUERY_PAGE_PARAMS[0].to_string(),
        }
    }

    /// Builds the URL of a listing page
    ///
    /// Page 1 is the base URL verbatim.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_scribe::url::PaginationScheme;
    ///
    /// let base = "https://example.com/page/1/";
    /// let scheme = PaginationScheme::detect(base);
    /// assert_eq!(scheme.page_url(base, 3).unwrap(), "https://example.com/page/3/");
    ///
    /// let base = "https://x.com?page=1";
    /// let scheme = PaginationScheme::detect(base);
    /// assert_eq!(scheme.page_url(base, 5).unwrap(), "https://x.com?page=5");
    /// ```
    pub fn page_url(&self, base_url: &str, page: u32) -> Result<String, UrlError> {
        if page == 0 {
            return Err(UrlError::Malformed("page numbers start at 1".to_string()));
        }

        Url::parse(base_url).map_err(|e| UrlError::Parse(e.to_string()))?;

        if page == 1 {
            return Ok(base_url.to_string());
        }

        Ok(match self.format {
            PaginationFormat::QueryParameter => with_query_page(base_url, &self.param, page),
            PaginationFormat::PathSegment => with_path_page(base_url, page),
        })
    }
}

/// Checks if a URL looks like a listing page rather than an article
pub fn looks_like_pagination(url: &str) -> bool {
    let (_, path, rest) = split_url(url);

    let numbered_query = query_pairs(rest).any(|(name, value)| {
        is_query_page_param(name) && !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
    });

    numbered_query || numbered_path_marker(path)
}

/// Splits a URL into (scheme + authority, path, query + fragment)
fn split_url(url: &str) -> (&str, &str, &str) {
    let authority_start = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url[authority_start..]
        .find(['/', '?', '#'])
        .map(|i| i + authority_start)
        .unwrap_or(url.len());
    let path_end = url[path_start..]
        .find(['?', '#'])
        .map(|i| i + path_start)
        .unwrap_or(url.len());

    (&url[..path_start], &url[path_start..path_end], &url[path_end..])
}

/// Splits `?query#fragment` into its query text and the `#fragment` tail
fn split_query(rest: &str) -> (&str, &str) {
    let (query, fragment) = match rest.find('#') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, ""),
    };
    (query.strip_prefix('?').unwrap_or(query), fragment)
}

fn query_pairs(rest: &str) -> impl Iterator<Item = (&str, &str)> {
    let (query, _) = split_query(rest);
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
}

fn is_query_page_param(name: &str) -> bool {
    QUERY_PAGE_PARAMS
        .iter()
        .any(|p| p.eq_ignore_ascii_case(name))
}

fn query_marker(rest: &str) -> Option<&str> {
    query_pairs(rest)
        .map(|(name, _)| name)
        .find(|name| is_query_page_param(name))
}

/// Index of the `page` segment in a path split on `/`, when it is followed
/// by a number or closes the path
fn path_marker_index(path: &str) -> Option<usize> {
    let segments: Vec<&str> = path.trim_end_matches('/').split('/').collect();
    segments.iter().enumerate().find_map(|(i, segment)| {
        if !segment.eq_ignore_ascii_case(PATH_PAGE_SEGMENT) {
            return None;
        }
        match segments.get(i + 1) {
            None => Some(i),
            Some(next) if is_number(next) => Some(i),
            Some(_) => None,
        }
    })
}

fn numbered_path_marker(path: &str) -> bool {
    let segments: Vec<&str> = path.split('/').collect();
    segments
        .windows(2)
        .any(|pair| pair[0].eq_ignore_ascii_case(PATH_PAGE_SEGMENT) && is_number(pair[1]))
}

fn is_number(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

fn with_query_page(base_url: &str, param: &str, page: u32) -> String {
    let (origin, path, rest) = split_url(base_url);
    let (query, fragment) = split_query(rest);

    let mut replaced = false;
    let mut pairs: Vec<String> = Vec::new();
    for pair in query.split('&') {
        let name = pair.split_once('=').map(|(n, _)| n).unwrap_or(pair);
        if !replaced && name.eq_ignore_ascii_case(param) {
            pairs.push(format!("{}={}", name, page));
            replaced = true;
        } else {
            pairs.push(pair.to_string());
        }
    }

    let new_query = if replaced {
        pairs.join("&")
    } else if query.is_empty() {
        format!("{}={}", param, page)
    } else if query.ends_with('&') {
        format!("{}{}={}", query, param, page)
    } else {
        format!("{}&{}={}", query, param, page)
    };

    format!("{}{}?{}{}", origin, path, new_query, fragment)
}

fn with_path_page(base_url: &str, page: u32) -> String {
    let (origin, path, rest) = split_url(base_url);
    let trailing_slash = path.len() > 1 && path.ends_with('/');

    let mut segments: Vec<String> = path
        .trim_end_matches('/')
        .split('/')
        .map(str::to_string)
        .collect();

    match path_marker_index(path) {
        Some(i) if i + 1 < segments.len() => segments[i + 1] = page.to_string(),
        Some(_) => segments.push(page.to_string()),
        None => {
            segments.push(PATH_PAGE_SEGMENT.to_string());
            segments.push(page.to_string());
        }
    }

    let mut new_path = segments.join("/");
    if !new_path.starts_with('/') {
        new_path.insert(0, '/');
    }
    if trailing_slash {
        new_path.push('/');
    }

    format!("{}{}{}", origin, new_path, rest)
}
