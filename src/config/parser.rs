use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Reads and parses a configuration file without validating it
///
/// Use this when command-line flags are applied on top of the file before
/// validation; [`load_config`] otherwise.
pub fn parse_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config_str(&content)
}

/// Parses configuration from a TOML string
pub fn parse_config_str(content: &str) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(content)?;

    // A seed given without a scheme gets the same treatment as on the CLI
    let seed = config.seed_url.clone();
    config.set_seed(&seed);

    Ok(config)
}

/// Loads, parses, and validates a configuration file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use ledger_crawl::config::load_config;
///
/// let config = load_config(Path::new("crawl.toml")).unwrap();
/// println!("Max depth: {}", config.crawler.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config = parse_config(path)?;
    validate(&config)?;
    Ok(config)
}
