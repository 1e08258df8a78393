//! Hyperlink extraction from rendered HTML
//!
//! **Include:** `<a href="...">` anywhere in the searched scope
//!
//! **Exclude:**
//! - `<a href="..." download>`
//! - `javascript:`, `mailto:`, `tel:` links
//! - Data URIs
//! - Fragment-only links
//! - Anything that does not resolve to HTTP(S)

use crate::extract::selector::ElementSelector;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// All hyperlinks on a page, resolved against `base_url`, in document order
pub fn page_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    anchors(document.root_element(), base_url)
}

/// Hyperlinks inside every element matched by the article-list selector
///
/// Returns an empty list when the selector matches nothing.
pub fn article_links(html: &str, base_url: &Url, list: &ElementSelector) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(list.css())
        .flat_map(|container| anchors(container, base_url))
        .collect()
}

fn anchors(scope: ElementRef<'_>, base_url: &Url) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    scope
        .select(&a_selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}
