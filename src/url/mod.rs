//! URL handling module
//!
//! This module provides link resolution, same-domain checks, and the small
//! naming helpers that map URLs onto the download directory.

mod domain;
mod normalize;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, same_domain};
pub use normalize::resolve;

/// Prefixes `https://` onto a URL that carries no http(s) scheme
///
/// # Examples
///
/// ```
/// use ledger_crawl::url::ensure_scheme;
///
/// assert_eq!(ensure_scheme("example.com"), "https://example.com");
/// assert_eq!(ensure_scheme("http://example.com"), "http://example.com");
/// ```
pub fn ensure_scheme(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    }
}

/// Parses a seed URL, requiring an http(s) scheme and a host
pub fn parse_seed(raw: &str) -> UrlResult<Url> {
    let url = Url::parse(raw).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::Parse(format!(
            "{}: only http and https are supported",
            raw
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(raw.to_string()));
    }

    Ok(url)
}

/// Builds the per-crawl download directory name from the seed URL
///
/// `://` collapses to a single `_`, then every remaining `:`, `/` and `.`
/// becomes `_`.
///
/// # Examples
///
/// ```
/// use ledger_crawl::url::download_dir_name;
///
/// assert_eq!(download_dir_name("https://example.com"), "https_example_com");
/// ```
pub fn download_dir_name(seed: &str) -> String {
    seed.replace("://", "_")
        .chars()
        .map(|c| match c {
            ':' | '/' | '.' => '_',
            other => other,
        })
        .collect()
}

/// Derives the file name a downloaded URL is saved under
///
/// Uses the last non-empty path segment, falling back to the host and then
/// to `index.html`.
pub fn file_name_for(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .or_else(|| url.host_str().map(str::to_string))
        .unwrap_or_else(|| "index.html".to_string())
}
