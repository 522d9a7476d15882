//! Stylesheet reference extraction from rendered HTML.
//!
//! The default extractor scans for `<link>` tags whose `href` ends in one
//! of the stylesheet extensions. Extraction is intentionally dumb: results
//! follow first-occurrence order and duplicates are preserved — the
//! pipeline's memoization, keyed on the reference text, is what collapses
//! repeated work.

use std::sync::LazyLock;

use regex::Regex;

/// Match a stylesheet link and capture the `href` value.
/// Case-sensitive on the extension set.
static STYLESHEET_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<link\s+[^>]*href="([^"]+\.(?:css|scss|sass))"[^>]*>"#)
        .expect("stylesheet link pattern is valid")
});

/// Extraction of stylesheet references from a rendered document.
///
/// Implement this to support other document formats or additional
/// stylesheet syntaxes without touching the orchestrator.
pub trait ReferenceExtractor: Send + Sync {
    /// All references in first-occurrence order, duplicates included.
    fn extract(&self, html: &str) -> Vec<String>;
}

/// Regex-driven `<link href="...">` extractor for HTML documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkExtractor;

impl ReferenceExtractor for LinkExtractor {
    fn extract(&self, html: &str) -> Vec<String> {
        STYLESHEET_LINK_RE
            .captures_iter(html)
            .map(|caps| caps[1].to_string())
            .collect()
    }
}
