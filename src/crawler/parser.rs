//! HTML link extraction
//!
//! Produces the raw `href` values of a page's anchors. Resolution against the
//! page URL and all filtering by host or depth happen in the traversal engine.

use scraper::{Html, Selector};

/// Extracts raw link targets from an HTML document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - Empty hrefs
/// - Fragment-only hrefs (same-page anchors)
/// - `javascript:`, `mailto:`, `tel:` and `data:` hrefs
///
/// Values are returned trimmed but otherwise as written, in document order.
/// The result can be iterated any number of times.
///
/// # Example
///
/// ```
/// use ledger_crawl::crawler::extract_hrefs;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// assert_eq!(extract_hrefs(html), vec!["/page".to_string()]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| is_followable(href))
        .map(str::to_string)
        .collect()
}

/// Extracts links from a response body, decoding it lossily as UTF-8
pub fn extract_hrefs_from_bytes(body: &[u8]) -> Vec<String> {
    extract_hrefs(&String::from_utf8_lossy(body))
}

/// Returns false for hrefs that can never lead to a fetchable page
fn is_followable(href: &str) -> bool {
    if href.is_empty() || href.starts_with('#') {
        return false;
    }

    let lower = href.to_ascii_lowercase();
    !(lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:"))
}
