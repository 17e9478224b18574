use crate::config::types::{Config, CrawlConfig, FetchConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawler)?;
    validate_fetch_config(&config.fetch)?;
    Ok(())
}

/// Validates the crawl engine configuration
///
/// A worker count of zero is a fatal configuration error: the engine must
/// never be constructed with it.
pub fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_workers == 0 {
        return Err(ConfigError::Validation(
            "max_workers must be greater than 0".to_string(),
        ));
    }

    if config.max_depth < -1 {
        return Err(ConfigError::Validation(format!(
            "max_depth must be -1 (unlimited) or >= 0, got {}",
            config.max_depth
        )));
    }

    validate_threshold("topic_threshold", config.topic_threshold)?;
    validate_threshold("link_threshold", config.link_threshold)?;

    Ok(())
}

fn validate_threshold(name: &str, value: f32) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{} must be within [0.0, 1.0], got {}",
            name, value
        )));
    }
    Ok(())
}

fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}
