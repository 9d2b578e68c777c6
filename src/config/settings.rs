//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub events: EventsConfig,
    pub rsvp: RsvpConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
    pub ttl_seconds: u64,
}

/// Hosted authentication provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Base URL of the provider's auth API, e.g. `https://xyz.example.co/auth/v1`
    pub provider_url: String,
    /// Public project key sent as the `apikey` header
    pub api_key: String,
    /// Shared secret used to verify access tokens
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,
    pub timeout_seconds: u64,
}

/// Event listing and visibility configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventsConfig {
    /// Offset of the community's local time from UTC
    pub utc_offset_minutes: i32,
    /// How long an event without an end time stays visible after it starts
    pub ended_grace_minutes: i64,
    pub page_size: usize,
    pub placeholder_image_url: String,
    pub placeholder_avatar_url: String,
    pub listing_cache_ttl_seconds: u64,
}

/// RSVP submission behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RsvpConfig {
    /// Delay before the in-flight guard is released after a write
    pub settle_delay_ms: u64,
}

/// Login throttling
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    pub login_attempts_per_minute: u32,
    pub login_burst: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: String,
    pub file_prefix: String,
    pub json: bool,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub redis_cache: bool,
    pub friends: bool,
    pub casual_plans: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::from_file("config")
    }

    /// Load settings from the named file (any format `config` understands),
    /// falling back to defaults and overlaying `EVENTBUDDY__*` variables
    pub fn from_file(name: &str) -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Settings::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(name).required(false))
            .add_source(
                config::Environment::with_prefix("EVENTBUDDY")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::EventBuddyError> {
        super::validation::validate_settings(self)
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                allowed_origins: vec!["http://localhost:5173".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/eventbuddy".to_string(),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_seconds: 30,
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                prefix: "eventbuddy:".to_string(),
                ttl_seconds: 3600,
            },
            auth: AuthConfig {
                provider_url: "http://localhost:9999/auth/v1".to_string(),
                api_key: String::new(),
                jwt_secret: "change-me".to_string(),
                jwt_audience: Some("authenticated".to_string()),
                timeout_seconds: 10,
            },
            events: EventsConfig {
                utc_offset_minutes: 0,
                ended_grace_minutes: 180,
                page_size: 24,
                placeholder_image_url: "/static/event-placeholder.jpg".to_string(),
                placeholder_avatar_url: "/static/avatar-placeholder.png".to_string(),
                listing_cache_ttl_seconds: 60,
            },
            rsvp: RsvpConfig {
                settle_delay_ms: 300,
            },
            rate_limit: RateLimitConfig {
                login_attempts_per_minute: 5,
                login_burst: 5,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: "logs".to_string(),
                file_prefix: "eventbuddy.log".to_string(),
                json: false,
            },
            features: FeaturesConfig {
                redis_cache: true,
                friends: true,
                casual_plans: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_load_from_toml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eventbuddy.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[server]\nport = 9090\n\n[rsvp]\nsettle_delay_ms = 0").unwrap();

        let settings = Settings::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.rsvp.settle_delay_ms, 0);
        // Untouched sections keep their defaults
        assert_eq!(settings.events.page_size, 24);
    }
}
