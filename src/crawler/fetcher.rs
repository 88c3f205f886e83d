//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests returning raw bytes plus the Content-Type header
//! - Classifying transport failures and non-success statuses

use crate::config::Config;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum number of redirects followed per request
const MAX_REDIRECTS: usize = 10;

/// Timeout for establishing a connection
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A successfully fetched resource
#[derive(Debug, Clone)]
pub struct FetchedContent {
    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status: u16,

    /// Content-Type header value (empty if absent)
    pub content_type: String,

    /// Raw response body
    pub body: Vec<u8>,
}

impl FetchedContent {
    /// Returns true if the Content-Type marks an HTML document
    pub fn is_html(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("text/html")
    }
}

/// Source of page content for the traversal engine
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`, returning its bytes and Content-Type
    ///
    /// Transport failures and non-2xx statuses are errors.
    async fn fetch(&self, url: &Url) -> Result<FetchedContent, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use ledger_crawl::config::Config;
/// use ledger_crawl::crawler::build_http_client;
///
/// let config = Config::new("https://example.com");
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent_string())
        .timeout(config.crawler.request_timeout())
        .connect_timeout(CONNECT_TIMEOUT)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from `config`
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedContent, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(url, e))?;

        Ok(FetchedContent {
            final_url,
            status: status.as_u16(),
            content_type,
            body: body.to_vec(),
        })
    }
}

/// Classifies a reqwest failure
fn transport_error(url: &Url, error: reqwest::Error) -> FetchError {
    let timeout = error.is_timeout();
    let message = if timeout {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else if error.is_redirect() {
        format!("Redirect error: {}", error)
    } else {
        error.to_string()
    };

    FetchError::Transport {
        url: url.to_string(),
        message,
        timeout,
    }
}
