//! Configuration module
//!
//! A run is configured from defaults, an optional TOML file, and command-line
//! overrides, in that order. The result is validated once and stays immutable
//! for the rest of the run.
//!
//! # Example
//!
//! ```no_run
//! use ledger_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_CONTENT_TYPES,
    DEFAULT_LOG_FILE, DEFAULT_MAX_DEPTH, DEFAULT_PARALLELISM, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_STATE_FILE,
};

// Re-export parser functions
pub use parser::{load_config, parse_config, parse_config_str};
pub use validation::{validate, MAX_PARALLELISM};
