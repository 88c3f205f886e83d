use crate::url::{download_dir_name, ensure_scheme};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default maximum crawl depth
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// Default number of concurrent workers
pub const DEFAULT_PARALLELISM: u32 = 4;

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default name of the download ledger
pub const DEFAULT_STATE_FILE: &str = "crawler_state.txt";

/// Default name of the log file
pub const DEFAULT_LOG_FILE: &str = "webCrawlerLog.txt";

/// Content types that are downloaded when no list is configured
pub const DEFAULT_CONTENT_TYPES: &[&str] = &["text/html", "application/javascript", "text/css"];

/// Main configuration structure for a crawl run
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Seed URL; normally supplied on the command line
    #[serde(rename = "seed-url", default)]
    pub seed_url: String,

    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Creates a configuration with default settings for `seed`
    ///
    /// `https://` is prefixed onto a seed that carries no scheme.
    pub fn new(seed: &str) -> Self {
        let mut config = Self::default();
        config.set_seed(seed);
        config
    }

    /// Replaces the seed URL, prefixing `https://` when needed
    pub fn set_seed(&mut self, seed: &str) {
        self.seed_url = if seed.trim().is_empty() {
            String::new()
        } else {
            ensure_scheme(seed)
        };
    }

    /// Directory that downloads of this run are written to
    pub fn download_dir(&self) -> PathBuf {
        self.output
            .download_root
            .join(download_dir_name(&self.seed_url))
    }

    /// Formatted User-Agent header value
    pub fn user_agent_string(&self) -> String {
        format!(
            "{}/{}",
            self.user_agent.crawler_name, self.user_agent.crawler_version
        )
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum depth to crawl from the seed URL
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Number of concurrent crawl workers
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,

    /// Per-request network timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Content-Type prefixes that are downloaded
    #[serde(rename = "allowed-content-types", default = "default_content_types")]
    pub allowed_content_types: Vec<String>,
}

impl CrawlerConfig {
    /// Per-request network timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns true if a response with this Content-Type should be downloaded
    ///
    /// Matching is a case-insensitive prefix match, so parameters such as
    /// `; charset=utf-8` are ignored.
    pub fn is_allowed_content_type(&self, content_type: &str) -> bool {
        let content_type = content_type.trim().to_ascii_lowercase();
        self.allowed_content_types
            .iter()
            .any(|allowed| content_type.starts_with(&allowed.to_ascii_lowercase()))
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            parallelism: DEFAULT_PARALLELISM,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            allowed_content_types: default_content_types(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the download ledger
    #[serde(rename = "state-file", default = "default_state_file")]
    pub state_file: PathBuf,

    /// Path to the append-mode log file
    #[serde(rename = "log-file", default = "default_log_file")]
    pub log_file: PathBuf,

    /// Directory under which the per-crawl download directory is created
    #[serde(rename = "download-root", default = "default_download_root")]
    pub download_root: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            log_file: default_log_file(),
            download_root: default_download_root(),
        }
    }
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_parallelism() -> u32 {
    DEFAULT_PARALLELISM
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_content_types() -> Vec<String> {
    DEFAULT_CONTENT_TYPES.iter().map(|s| s.to_string()).collect()
}

fn default_crawler_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_state_file() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_FILE)
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

fn default_download_root() -> PathBuf {
    PathBuf::from(".")
}
