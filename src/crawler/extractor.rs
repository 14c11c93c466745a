//! Indexable content extraction
//!
//! Turns a parsed document into the title, visible text and snippet stored in
//! a [`PageRecord`](crate::output::PageRecord).

use scraper::{ElementRef, Html, Node, Selector};

/// Title used when a page has no usable `<title>`
pub const UNTITLED_PAGE: &str = "Untitled Page";

/// Appended to fallback snippets cut from longer content
pub const SNIPPET_ELLIPSIS: &str = "...";

/// Candidate content regions, most specific first
const CONTENT_REGIONS: &[&str] = &["main", "[role=\"main\"]", "article", "section", "body"];

/// Elements whose subtrees never contribute text
const NOISE_ELEMENTS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "form", "noscript", "template",
];

/// Title, content and snippet extracted from one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub title: String,
    pub content: String,
    pub snippet: String,
}

/// Extracts indexable content from a parsed document
///
/// # Rules
///
/// - Title: trimmed `<title>` text, or [`UNTITLED_PAGE`] when absent or blank
/// - Content: visible text of the first matching region (`main`,
///   `[role=main]`, `article`, `section`, then `body`) with noise subtrees
///   skipped and whitespace collapsed
/// - Snippet: the non-empty `<meta name="description">` content, otherwise
///   the first `snippet_length` characters of the content plus `...` when
///   the content is longer
///
/// The document is not modified, so calling this twice gives the same result.
pub fn extract(document: &Html, snippet_length: usize) -> ExtractedContent {
    let content = extract_content(document);
    let snippet = match meta_description(document) {
        Some(description) => description,
        None => fallback_snippet(&content, snippet_length),
    };

    ExtractedContent {
        title: extract_title(document),
        content,
        snippet,
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return UNTITLED_PAGE.to_string();
    };

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED_PAGE.to_string())
}

fn meta_description(document: &Html) -> Option<String> {
    let selector = Selector::parse("meta[name][content]").ok()?;

    document
        .select(&selector)
        .find(|element| {
            element
                .value()
                .attr("name")
                .is_some_and(|name| name.eq_ignore_ascii_case("description"))
        })
        .and_then(|element| element.value().attr("content"))
        .map(str::trim)
        .filter(|description| !description.is_empty())
        .map(str::to_string)
}

/// Visible text of the highest-priority content region
fn extract_content(document: &Html) -> String {
    let Some(region) = content_region(document) else {
        return String::new();
    };

    let mut pieces = Vec::new();
    collect_text(region, &mut pieces);

    pieces
        .iter()
        .flat_map(|piece| piece.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

fn content_region(document: &Html) -> Option<ElementRef<'_>> {
    CONTENT_REGIONS.iter().find_map(|region| {
        let selector = Selector::parse(region).ok()?;
        document.select(&selector).next()
    })
}

fn collect_text<'a>(element: ElementRef<'a>, pieces: &mut Vec<&'a str>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => pieces.push(text),
            Node::Element(el) if NOISE_ELEMENTS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, pieces);
                }
            }
            _ => {}
        }
    }
}

/// First `length` characters of `content`, with an ellipsis when truncated
fn fallback_snippet(content: &str, length: usize) -> String {
    if content.chars().count() <= length {
        return content.trim().to_string();
    }

    let head: String = content.chars().take(length).collect();
    format!("{}{}", head.trim(), SNIPPET_ELLIPSIS)
}
