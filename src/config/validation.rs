//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{EventBuddyError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    if settings.features.redis_cache {
        validate_redis_config(&settings.redis)?;
    }
    validate_auth_config(&settings.auth)?;
    validate_events_config(&settings.events)?;
    validate_rate_limit_config(&settings.rate_limit)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(EventBuddyError::Config("Server host is required".to_string()));
    }

    if config.port == 0 {
        return Err(EventBuddyError::Config("Server port must be greater than 0".to_string()));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(EventBuddyError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(EventBuddyError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.acquire_timeout_seconds == 0 {
        return Err(EventBuddyError::Config(
            "Database acquire timeout must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(EventBuddyError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(EventBuddyError::Config("Redis URL is required".to_string()));
    }

    Ok(())
}

fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.provider_url.is_empty() {
        return Err(EventBuddyError::Config("Auth provider URL is required".to_string()));
    }

    url::Url::parse(&config.provider_url)
        .map_err(|e| EventBuddyError::Config(format!("Invalid auth provider URL: {}", e)))?;

    if config.jwt_secret.is_empty() {
        return Err(EventBuddyError::Config("JWT secret is required".to_string()));
    }

    if config.timeout_seconds == 0 {
        return Err(EventBuddyError::Config(
            "Auth timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_events_config(config: &super::EventsConfig) -> Result<()> {
    if config.page_size == 0 {
        return Err(EventBuddyError::Config("Page size must be greater than 0".to_string()));
    }

    // Real-world offsets range from UTC-12 to UTC+14
    if !(-12 * 60..=14 * 60).contains(&config.utc_offset_minutes) {
        return Err(EventBuddyError::Config(format!(
            "UTC offset out of range: {} minutes",
            config.utc_offset_minutes
        )));
    }

    if config.ended_grace_minutes < 0 {
        return Err(EventBuddyError::Config(
            "Ended grace period cannot be negative".to_string(),
        ));
    }

    Ok(())
}

fn validate_rate_limit_config(config: &super::RateLimitConfig) -> Result<()> {
    if config.login_attempts_per_minute == 0 || config.login_burst == 0 {
        return Err(EventBuddyError::Config(
            "Login rate limit values must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(EventBuddyError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(EventBuddyError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}
