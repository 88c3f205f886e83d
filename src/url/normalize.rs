use url::Url;

/// Resolves a raw link found on a page into an absolute URL string
///
/// # Resolution Rules
///
/// 1. An empty (or whitespace-only) link resolves to nothing
/// 2. A link that already parses as an absolute URL is returned unchanged
/// 3. Anything else is resolved against `base` as an RFC 3986 reference,
///    keeping the base's scheme and host
/// 4. A malformed base, or a reference that cannot be joined, resolves to
///    nothing
///
/// Resolution never fails loudly; callers treat `None` as "skip this link".
///
/// # Arguments
///
/// * `base` - URL of the page the link was found on
/// * `link` - The raw `href` value
///
/// # Examples
///
/// ```
/// use ledger_crawl::url::resolve;
///
/// assert_eq!(
///     resolve("https://example.com/bar", "/foo").as_deref(),
///     Some("https://example.com/foo")
/// );
/// assert_eq!(
///     resolve("https://example.com/bar", "https://other.com/x").as_deref(),
///     Some("https://other.com/x")
/// );
/// assert_eq!(resolve("https://example.com/", ""), None);
/// ```
pub fn resolve(base: &str, link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }

    if Url::parse(link).is_ok() {
        return Some(link.to_string());
    }

    let base = Url::parse(base).ok()?;
    base.join(link).ok().map(|joined| joined.to_string())
}
