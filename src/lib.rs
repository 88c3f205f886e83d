//! ledger-crawl: a bounded-depth, same-domain web crawler
//!
//! This crate walks the link graph below a seed URL, downloads the documents
//! that live on the seed's host, and records every completed download in an
//! append-only ledger so later runs never fetch them again.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Seed URL is invalid: {0}")]
    InvalidSeed(#[from] UrlError),

    #[error("Seed URL could not be fetched: {0}")]
    SeedUnreachable(#[source] FetchError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Errors produced by a content fetcher
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {message}")]
    Transport {
        url: String,
        message: String,
        timeout: bool,
    },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Errors raised while reading or appending to the download ledger
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("State file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use crate::url::{ensure_scheme, resolve, same_domain};
pub use config::Config;
pub use crawler::{crawl, Coordinator};
pub use output::CrawlStatistics;
pub use state::{CrawlTask, DownloadLedger, TaskState, VisitedSet};
