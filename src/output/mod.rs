//! Output module for crawl summaries
//!
//! This module records per-run counters and renders the end-of-run report.

pub mod stats;

pub use stats::{print_statistics, CrawlStatistics, StatsRecorder};
