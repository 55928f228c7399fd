use crate::config::types::{Config, FetchConfig, NamespaceMap};
use crate::crawler::SITEMAP_PREFIX;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_courses_url(&config.courses_url)?;
    validate_namespace_mapping(&config.namespace_mapping)?;
    validate_output(config)?;
    validate_fetch_config(&config.fetch)?;
    Ok(())
}

/// Validates the sitemap endpoint
fn validate_courses_url(courses_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(courses_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid courses_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "courses_url '{}' must use http or https",
            courses_url
        )));
    }

    Ok(())
}

/// Validates that the sitemap query prefix is mapped to a namespace
fn validate_namespace_mapping(mapping: &NamespaceMap) -> Result<(), ConfigError> {
    match mapping.get(SITEMAP_PREFIX) {
        Some(uri) if !uri.is_empty() => Ok(()),
        Some(_) => Err(ConfigError::Validation(format!(
            "namespace_mapping.{} cannot be empty",
            SITEMAP_PREFIX
        ))),
        None => Err(ConfigError::Validation(format!(
            "namespace_mapping must define the '{}' prefix",
            SITEMAP_PREFIX
        ))),
    }
}

/// Validates course count and output destination
fn validate_output(config: &Config) -> Result<(), ConfigError> {
    if config.courses_amount < 1 {
        return Err(ConfigError::Validation(format!(
            "courses_amount must be >= 1, got {}",
            config.courses_amount
        )));
    }

    if config.filepath.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "filepath cannot be empty".to_string(),
        ));
    }

    if let Some(log_file) = &config.log_file {
        if log_file.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "log_file cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates HTTP behaviour settings
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "fetch.timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}
