use crate::config::types::{
    Config, DriverConfig, IdentityConfig, SearchConfig, StatusConfig, TrendsConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_identity_config(&config.identity)?;
    validate_status_config(&config.status)?;
    validate_trends_config(&config.trends)?;
    validate_driver_config(&config.driver)?;
    Ok(())
}

/// Validates search request configuration
///
/// The base URL must be bare scheme and host: search paths are appended to
/// it, and the header override only matches `/search` at the root.
pub(crate) fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    validate_http_url("base-url", &config.base_url)?;

    let path = Url::parse(&config.base_url)
        .map(|url| url.path().to_string())
        .unwrap_or_default();
    if !path.is_empty() && path != "/" {
        return Err(ConfigError::Validation(format!(
            "base-url '{}' must not have a path, got '{}'",
            config.base_url, path
        )));
    }

    if config.min_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "min-delay-ms ({}) must not exceed max-delay-ms ({})",
            config.min_delay_ms, config.max_delay_ms
        )));
    }

    Ok(())
}

/// Validates identity configuration
fn validate_identity_config(config: &IdentityConfig) -> Result<(), ConfigError> {
    if config.desktop_user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "desktop-user-agent cannot be empty".to_string(),
        ));
    }

    if config.mobile_user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "mobile-user-agent cannot be empty".to_string(),
        ));
    }

    for (name, value) in [
        ("desktop-override", &config.desktop_override),
        ("mobile-override", &config.mobile_override),
    ] {
        if matches!(value, Some(v) if v.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "{} cannot be empty when set",
                name
            )));
        }
    }

    if let Some(url) = &config.stable_source_url {
        validate_http_url("stable-source-url", url)?;
    }

    if let Some(url) = &config.updated_source_url {
        validate_http_url("updated-source-url", url)?;
    }

    Ok(())
}

/// Validates remote status configuration
fn validate_status_config(config: &StatusConfig) -> Result<(), ConfigError> {
    validate_http_url("status endpoint", &config.endpoint)?;

    if config.points_per_search < 1 {
        return Err(ConfigError::Validation(format!(
            "points-per-search must be >= 1, got {}",
            config.points_per_search
        )));
    }

    Ok(())
}

/// Validates that at least one trend word source exists
fn validate_trends_config(config: &TrendsConfig) -> Result<(), ConfigError> {
    let has_inline = config.words.iter().any(|w| !w.trim().is_empty());
    if !has_inline && config.words_file.is_none() {
        return Err(ConfigError::Validation(
            "trends needs at least one word or a words-file".to_string(),
        ));
    }

    Ok(())
}

/// Validates driver configuration
fn validate_driver_config(config: &DriverConfig) -> Result<(), ConfigError> {
    if config.interval_minutes < 1 {
        return Err(ConfigError::Validation(format!(
            "interval-minutes must be >= 1, got {}",
            config.interval_minutes
        )));
    }

    if config.online_wait_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "online-wait-secs must be >= 1, got {}",
            config.online_wait_secs
        )));
    }

    Ok(())
}

/// Validates that a URL parses and uses an http(s) scheme
fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            name, value
        )));
    }

    Ok(())
}
