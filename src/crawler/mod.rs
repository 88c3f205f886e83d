//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Fetcher`] seam
//! - HTML link extraction
//! - Saving documents behind the [`ContentWriter`] seam
//! - The shared frontier and overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;
mod writer;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, FetchedContent, Fetcher, HttpFetcher};
pub use parser::{extract_hrefs, extract_hrefs_from_bytes};
pub use scheduler::Frontier;
pub use writer::{ContentWriter, FileWriter};

use crate::config::Config;
use crate::output::CrawlStatistics;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration
/// 2. Load the download ledger
/// 3. Build the HTTP client and create the download directory
/// 4. Fetch the seed, then drain the frontier with the worker pool
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Crawl completed; individual page failures are
///   counted, not returned
/// * `Err(CrawlError)` - Invalid configuration, unreachable seed, or setup
///   failure
pub async fn crawl(config: Config) -> Result<CrawlStatistics, CrawlError> {
    run_crawl(config, false).await
}
