//! Configuration management for the ChatFlow backend
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default.toml, config/{env}.toml, config/local.toml)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// External platform configuration (identity, store, blob storage)
    pub platform: PlatformConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Browser origins allowed by CORS; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Connection settings for the external platform.
///
/// The platform exposes three capabilities under one base URL: a
/// GoTrue-compatible identity API (`/auth/v1`), a PostgREST-compatible
/// relational API (`/rest/v1`), and an object storage API (`/storage/v1`).
/// The anon key is the minimal-privilege credential; callers' bearer tokens
/// are forwarded per request and never stored here.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlatformConfig {
    /// Platform base URL
    pub url: String,

    /// Minimal-privilege (anonymous) API key
    pub anon_key: String,

    /// Bucket holding uploaded document files
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Request timeout in seconds for platform calls
    #[serde(default = "default_platform_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Metrics port (0 to disable the Prometheus exporter)
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Requests per second
    #[serde(default = "default_rate_limit")]
    pub requests_per_second: u32,

    /// Burst capacity
    #[serde(default = "default_burst")]
    pub burst: u32,

    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_bucket() -> String { "documents-storage".to_string() }
fn default_platform_timeout() -> u64 { 30 }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_metrics_port() -> u16 { 9090 }
fn default_service_name() -> String { "chatflow".to_string() }
fn default_rate_limit() -> u32 { 50 }
fn default_burst() -> u32 { 100 }
fn default_enabled() -> bool { true }

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?

            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__PLATFORM__URL=https://xyz.example.com
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        config.try_deserialize()
    }
}

impl PlatformConfig {
    fn base(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Identity API root
    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.base())
    }

    /// Relational store API root
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.base())
    }

    /// Blob storage API root
    pub fn storage_url(&self) -> String {
        format!("{}/storage/v1", self.base())
    }

    /// Get the platform request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                cors_origins: Vec::new(),
            },
            platform: PlatformConfig {
                url: "http://localhost:54321".to_string(),
                anon_key: "dev-anon-key".to_string(),
                bucket: default_bucket(),
                request_timeout_secs: default_platform_timeout(),
            },
            observability: ObservabilityConfig {
                log_level: default_log_level(),
                json_logging: default_json_logging(),
                metrics_port: default_metrics_port(),
                service_name: default_service_name(),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: default_rate_limit(),
                burst: default_burst(),
                enabled: default_enabled(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.platform.bucket, "documents-storage");
        assert!(config.rate_limit.enabled);
    }

    #[test]
    fn test_platform_urls_trim_trailing_slash() {
        let mut config = AppConfig::default();
        config.platform.url = "https://abc.example.co/".to_string();
        assert_eq!(config.platform.auth_url(), "https://abc.example.co/auth/v1");
        assert_eq!(config.platform.rest_url(), "https://abc.example.co/rest/v1");
        assert_eq!(
            config.platform.storage_url(),
            "https://abc.example.co/storage/v1"
        );
    }
}
