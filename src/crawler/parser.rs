//! HTML parser for extracting links and metadata
//!
//! This module handles parsing HTML content to extract:
//! - Links to follow (from `<a href>` tags)
//! - The declared canonical URL (`<link rel="canonical">`)
//!
//! Every URL returned here is absolute and normalized.

use crate::url::resolve_link;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Parses a response body into a document
///
/// Parsing is lenient; malformed markup still yields a (possibly empty) tree.
pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

/// Extracts all followable links from the document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links
///
/// **Note:** `rel="nofollow"` links ARE followed
///
/// Hrefs are resolved against `base_url` (the response's final URL) and
/// normalized. Duplicates are dropped; document order is kept.
pub fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&a_selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(absolute_url) = resolve_link(href, base_url) {
            if seen.insert(absolute_url.as_str().to_string()) {
                links.push(absolute_url);
            }
        }
    }

    links
}

/// Returns the normalized canonical URL declared by the document, if any
///
/// Only the first `<link rel="canonical">` counts. A relative href is
/// resolved against `base_url`.
pub fn canonical_url(document: &Html, base_url: &Url) -> Option<Url> {
    let selector = Selector::parse("link[rel][href]").ok()?;

    document
        .select(&selector)
        .find(|element| {
            element
                .value()
                .attr("rel")
                .is_some_and(|rel| {
                    rel.split_whitespace()
                        .any(|token| token.eq_ignore_ascii_case("canonical"))
                })
        })
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| resolve_link(href, base_url))
}
