use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ledger_crawl::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks whether `candidate` lives on the same host as `seed`
///
/// Only hostnames are compared; scheme and port are ignored. Any parse
/// failure, or a URL without a host, yields `false`.
///
/// # Examples
///
/// ```
/// use ledger_crawl::url::same_domain;
///
/// assert!(same_domain("https://example.com", "http://EXAMPLE.com:8080/a"));
/// assert!(!same_domain("https://example.com", "https://other.com/x"));
/// assert!(!same_domain("https://example.com", "not a url"));
/// ```
pub fn same_domain(seed: &str, candidate: &str) -> bool {
    let (Ok(seed), Ok(candidate)) = (Url::parse(seed), Url::parse(candidate)) else {
        return false;
    };

    match (extract_domain(&seed), extract_domain(&candidate)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
