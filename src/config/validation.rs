use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::url::parse_seed;
use crate::ConfigError;

/// Upper bound on concurrent workers
pub const MAX_PARALLELISM: u32 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_seed(&config.seed_url)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the seed URL
fn validate_seed(seed: &str) -> Result<(), ConfigError> {
    if seed.trim().is_empty() {
        return Err(ConfigError::Validation("URL can't be empty".to_string()));
    }

    parse_seed(seed).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_depth == 0 {
        return Err(ConfigError::Validation(
            "max_depth must be greater than 0".to_string(),
        ));
    }

    if config.parallelism < 1 || config.parallelism > MAX_PARALLELISM {
        return Err(ConfigError::Validation(format!(
            "parallelism must be between 1 and {}, got {}",
            MAX_PARALLELISM, config.parallelism
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.allowed_content_types.is_empty() {
        return Err(ConfigError::Validation(
            "allowed_content_types cannot be empty".to_string(),
        ));
    }

    if config
        .allowed_content_types
        .iter()
        .any(|ct| ct.trim().is_empty())
    {
        return Err(ConfigError::Validation(
            "allowed_content_types cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters, hyphens and \
             underscores, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.state_file.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "state_file cannot be empty".to_string(),
        ));
    }

    if config.log_file.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "log_file cannot be empty".to_string(),
        ));
    }

    if config.download_root.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "download_root cannot be empty".to_string(),
        ));
    }

    Ok(())
}
