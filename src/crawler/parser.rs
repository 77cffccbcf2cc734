//! HTML parser for extracting text, links, and metadata
//!
//! This module turns fetched HTML into the pieces the pipeline needs:
//! the page title, the visible text (what gets indexed and fingerprinted),
//! and the outbound links in source order.

use scraper::{Html, Selector};
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from <title>)
    pub title: Option<String>,

    /// Visible text content, whitespace-normalized
    pub text: String,

    /// All links found on the page (absolute URLs, source order)
    pub links: Vec<String>,
}

/// Parses HTML content and extracts title, text, and links
///
/// # Link Extraction Rules
///
/// Every `<a href="...">` anchor is resolved against the base URL, and
/// only links that resolve to an http or https URL are kept. That single
/// check also discards `javascript:`, `mailto:` and similar hrefs, since
/// they resolve to non-http schemes. Fragment-only anchors point back at
/// the page being parsed and are skipped outright.
///
/// # Text Extraction
///
/// Visible text of the whole document with `<script>` and `<style>`
/// contents excluded, joined with single spaces.
///
/// # Example
///
/// ```no_run
/// use lantern::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        text: extract_text(&document),
        links: extract_links(&document, base_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let element = document.select(&selector).next()?;

    let title: String = element.text().collect();
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Extracts visible text, skipping script and style subtrees
fn extract_text(document: &Html) -> String {
    let mut words: Vec<String> = Vec::new();

    if let Ok(body_selector) = Selector::parse("body") {
        if let Some(body) = document.select(&body_selector).next() {
            for node in body.descendants() {
                if let scraper::Node::Text(text) = node.value() {
                    let skipped = node.ancestors().any(|ancestor| {
                        ancestor.value().as_element().map_or(false, |element| {
                            matches!(element.name(), "script" | "style" | "noscript")
                        })
                    });
                    if !skipped {
                        words.extend(text.split_whitespace().map(|w| w.to_string()));
                    }
                }
            }
        }
    }

    words.join(" ")
}

/// Extracts all outbound links from the HTML document, in source order
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&anchor_selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves an href against the page URL, keeping only http(s) targets
///
/// Hrefs with other schemes (javascript:, mailto:, ...) survive resolution
/// with their scheme intact and are rejected by the same check.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    // A fragment-only href is an anchor within the page being parsed
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let resolved = base_url.join(href).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved.into()),
        _ => None,
    }
}
