//! Per-site selector strings, resolved once into typed selectors

use crate::config::SiteRecord;
use crate::ConfigError;
use scraper::Selector;
use std::fmt;

/// How a configured selector string locates elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    /// Match on the `class` attribute
    ByClass,
    /// Match on the `id` attribute
    ById,
    /// Match on the presence (or value) of an attribute
    ByAttribute,
}

impl fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ByClass => "class",
            Self::ById => "id",
            Self::ByAttribute => "attribute",
        };
        f.write_str(text)
    }
}

/// A selector string with its kind and compiled CSS form
///
/// Syntax of the configured string:
/// - `data-...` or `[...]` selects by attribute (`data-role=main` also
///   compares the value)
/// - `#name` selects by id
/// - anything else is one or more class names, with an optional leading `.`
#[derive(Debug, Clone)]
pub struct ElementSelector {
    kind: SelectorKind,
    raw: String,
    css: Selector,
}

impl ElementSelector {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ConfigError::Validation("selector must not be empty".to_string()));
        }

        let (kind, css) = if raw.starts_with('[') {
            (SelectorKind::ByAttribute, raw.to_string())
        } else if raw.starts_with("data-") {
            let css = match raw.split_once('=') {
                Some((name, value)) => format!(
                    "[{}=\"{}\"]",
                    name.trim(),
                    escape_value(value.trim().trim_matches(['"', '\'']))
                ),
                None => format!("[{}]", raw),
            };
            (SelectorKind::ByAttribute, css)
        } else if let Some(id) = raw.strip_prefix('#') {
            (SelectorKind::ById, format!("[id=\"{}\"]", escape_value(id)))
        } else {
            let classes: Vec<&str> = raw.trim_start_matches('.').split_whitespace().collect();
            let css = classes
                .iter()
                .map(|class| format!("[class~=\"{}\"]", escape_value(class.trim_start_matches('.'))))
                .collect::<String>();
            (SelectorKind::ByClass, css)
        };

        let css = Selector::parse(&css).map_err(|e| {
            ConfigError::Validation(format!("invalid selector '{}': {:?}", raw, e))
        })?;

        Ok(Self {
            kind,
            raw: raw.to_string(),
            css,
        })
    }

    pub fn kind(&self) -> SelectorKind {
        self.kind
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn css(&self) -> &Selector {
        &self.css
    }
}

fn escape_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Selectors for one site, consumed read-only by the extractor
#[derive(Debug, Clone)]
pub struct ContentSelection {
    pub container: ElementSelector,
    pub content: Option<ElementSelector>,
    pub article_list: Option<ElementSelector>,
}

impl ContentSelection {
    /// Builds a selection; empty content and article-list strings mean
    /// "not configured"
    pub fn new(container: &str, content: &str, article_list: &str) -> Result<Self, ConfigError> {
        if container.trim().is_empty() {
            return Err(ConfigError::Validation(
                "container selector must not be empty".to_string(),
            ));
        }

        Ok(Self {
            container: ElementSelector::parse(container)?,
            content: optional(content)?,
            article_list: optional(article_list)?,
        })
    }

    /// Reads param1 (container), param2 (content) and param3 (article list)
    pub fn from_site(site: &SiteRecord) -> Result<Self, ConfigError> {
        Self::new(&site.param1, &site.param2, &site.param3)
    }
}

fn optional(raw: &str) -> Result<Option<ElementSelector>, ConfigError> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        ElementSelector::parse(raw).map(Some)
    }
}
