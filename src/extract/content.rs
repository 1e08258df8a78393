//! Content extraction and Markdown conversion

use crate::extract::selector::ContentSelection;
use crate::output::HEADER_PREFIX;
use crate::ExtractError;
use chrono::Utc;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Tags removed from the container before conversion
const BOILERPLATE_TAGS: &str = "script, style, nav, footer, header";

/// Tried in order inside the cleaned container when the content selector
/// matches nothing
const SECONDARY_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role=\"main\"]",
    "[itemprop=\"articleBody\"]",
    ".entry-content",
    ".post-content",
    ".article-content",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Extractor switches that are not per-site
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Also remove `<aside>` elements
    pub strip_aside: bool,
}

/// Turns rendered HTML into a Markdown document for `final_url`
///
/// The container is located first; a missing container is an error. Inside
/// the cleaned container the content selector picks the blocks to keep. If
/// it is not configured or matches nothing, the first secondary selector
/// that matches is used instead, and failing that the whole container.
///
/// The document starts with a provenance comment:
///
/// ```text
/// <!-- URL: https://a.test/docs | Scraped at: 2024-05-01 12:00:00 -->
/// ```
pub fn extract(
    html: &str,
    final_url: &str,
    selection: &ContentSelection,
    options: ExtractOptions,
) -> Result<String, ExtractError> {
    let body = extract_markdown(html, selection, options)?;
    Ok(format!(
        "{}{} | Scraped at: {} -->\n\n{}\n",
        HEADER_PREFIX,
        final_url,
        Utc::now().format(TIMESTAMP_FORMAT),
        body
    ))
}

/// Extracts and converts content without the provenance header
pub fn extract_markdown(
    html: &str,
    selection: &ContentSelection,
    options: ExtractOptions,
) -> Result<String, ExtractError> {
    let mut document = Html::parse_document(html);
    let boilerplate = boilerplate_selector(options.strip_aside);

    let (container_id, doomed) = {
        let container = document
            .select(selection.container.css())
            .next()
            .ok_or_else(|| ExtractError::MissingContainer {
                selector: selection.container.raw().to_string(),
            })?;
        let doomed: Vec<_> = boilerplate
            .as_ref()
            .map(|strip| {
                container
                    .select(strip)
                    .map(|element| element.id())
                    .filter(|id| *id != container.id())
                    .collect()
            })
            .unwrap_or_default();
        (container.id(), doomed)
    };

    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    let missing_content = || ExtractError::MissingContent {
        selector: selection
            .content
            .as_ref()
            .unwrap_or(&selection.container)
            .raw()
            .to_string(),
    };

    let container = document
        .tree
        .get(container_id)
        .and_then(ElementRef::wrap)
        .ok_or_else(missing_content)?;

    let blocks = selection
        .content
        .as_ref()
        .map(|content| top_level_matches(container, content.css()))
        .filter(|blocks| !blocks.is_empty())
        .or_else(|| secondary_blocks(container))
        .unwrap_or_else(|| vec![container]);

    let retained: String = blocks.iter().map(|block| block.html()).collect();
    let markdown = html2md::parse_html(&retained);
    let markdown = markdown.trim();

    if markdown.is_empty() {
        return Err(missing_content());
    }

    Ok(markdown.to_string())
}

fn boilerplate_selector(strip_aside: bool) -> Option<Selector> {
    let tags = if strip_aside {
        format!("{}, aside", BOILERPLATE_TAGS)
    } else {
        BOILERPLATE_TAGS.to_string()
    };
    Selector::parse(&tags).ok()
}

/// Matches of `selector` under `root`, skipping any nested inside another match
fn top_level_matches<'a>(root: ElementRef<'a>, selector: &Selector) -> Vec<ElementRef<'a>> {
    let matched: Vec<ElementRef<'a>> = root.select(selector).collect();
    let ids: HashSet<_> = matched.iter().map(|element| element.id()).collect();

    matched
        .into_iter()
        .filter(|element| !element.ancestors().any(|a| ids.contains(&a.id())))
        .collect()
}

fn secondary_blocks(container: ElementRef<'_>) -> Option<Vec<ElementRef<'_>>> {
    SECONDARY_SELECTORS.iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        let blocks = top_level_matches(container, &selector);
        (!blocks.is_empty()).then_some(blocks)
    })
}
