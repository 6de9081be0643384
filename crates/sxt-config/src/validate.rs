//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::{Config, DEFAULT_SCHEME};

/// Upper bound for `http.timeout_secs`.
const MAX_TIMEOUT_SECS: u64 = 600;

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_api(config)?;
    validate_identity(config)?;
    validate_session(config)?;
    validate_http(config)?;
    validate_logging(config)?;
    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_owned(),
        message: message.into(),
    }
}

fn validate_api(config: &Config) -> ConfigResult<()> {
    let url = config.api.base_url.trim();
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(invalid(
            "api.base_url",
            format!("'{url}' is not an http(s) URL"),
        ));
    }

    if config.api.scheme != DEFAULT_SCHEME {
        return Err(invalid(
            "api.scheme",
            format!(
                "unsupported scheme '{}'; only '{DEFAULT_SCHEME}' is available",
                config.api.scheme
            ),
        ));
    }

    Ok(())
}

fn validate_identity(config: &Config) -> ConfigResult<()> {
    if config
        .identity
        .user_id
        .as_deref()
        .is_some_and(|u| u.trim().is_empty())
    {
        return Err(invalid("identity.user_id", "must not be blank"));
    }
    if config
        .identity
        .join_code
        .as_deref()
        .is_some_and(|c| c.trim().is_empty())
    {
        return Err(invalid("identity.join_code", "must not be blank"));
    }
    Ok(())
}

fn validate_session(config: &Config) -> ConfigResult<()> {
    if config
        .session
        .directory
        .as_deref()
        .is_some_and(|d| d.as_os_str().is_empty())
    {
        return Err(invalid("session.directory", "must not be empty"));
    }
    Ok(())
}

fn validate_http(config: &Config) -> ConfigResult<()> {
    let secs = config.http.timeout_secs;
    if secs == 0 || secs > MAX_TIMEOUT_SECS {
        return Err(invalid(
            "http.timeout_secs",
            format!("timeout_secs must be between 1 and {MAX_TIMEOUT_SECS}, got {secs}"),
        ));
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        return Err(invalid(
            "logging.level",
            format!(
                "unsupported log level '{}'; expected one of: {}",
                config.logging.level,
                valid_levels.join(", ")
            ),
        ));
    }

    let valid_formats = ["pretty", "compact", "json", "full"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        return Err(invalid(
            "logging.format",
            format!(
                "unsupported log format '{}'; expected one of: {}",
                config.logging.format,
                valid_formats.join(", ")
            ),
        ));
    }

    Ok(())
}
