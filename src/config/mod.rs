//! Gateway configuration
//!
//! Configuration is environment-driven: `run_server` loads a `.env` file if
//! present, then `Config::from_env` reads typed sections with defaults. Every
//! section also derives serde so configs can be captured or logged as JSON.

use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Top-level gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Upstream provider settings
    pub provider: ProviderSettings,
    /// Service registry settings
    pub registry: RegistrySettings,
    /// Retry policy settings
    pub retry: RetrySettings,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: env_or("HOST", "0.0.0.0"),
                port: parse_env("PORT", default_port)?,
            },
            provider: ProviderSettings {
                api_key: std::env::var("GROQ_API_KEY").ok(),
                api_base: env_or("GROQ_API_BASE", "https://api.groq.com/openai/v1"),
                model: env_or("GROQ_MODEL", "gemma2-9b-it"),
                timeout_secs: parse_env("GROQ_TIMEOUT_SECS", default_timeout_secs)?,
            },
            registry: RegistrySettings {
                enabled: parse_env("CONSUL_ENABLED", default_enabled)?,
                host: env_or("CONSUL_HOST", "localhost"),
                port: parse_env("CONSUL_PORT", default_registry_port)?,
                service_name: env_or("SERVICE_NAME", "llm-service"),
                service_id: env_or("SERVICE_ID", "llm-service-1"),
                check_interval: env_or("CONSUL_CHECK_INTERVAL", "10s"),
            },
            retry: RetrySettings::default(),
        })
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Upstream provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// API key for provider authentication; when absent the upstream client
    /// stays uninitialized and generation requests are rejected with 503
    pub api_key: Option<String>,
    /// API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Model identifier sent with every completion request
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: default_api_base(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Service registry (Consul agent) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySettings {
    /// Whether registration is attempted at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Registry agent host
    #[serde(default = "default_registry_host")]
    pub host: String,
    /// Registry agent port
    #[serde(default = "default_registry_port")]
    pub port: u16,
    /// Service name to register under
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Stable service id; re-registration with the same id is idempotent
    #[serde(default = "default_service_id")]
    pub service_id: String,
    /// Health check interval passed to the registry
    #[serde(default = "default_check_interval")]
    pub check_interval: String,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            host: default_registry_host(),
            port: default_registry_port(),
            service_name: default_service_name(),
            service_id: default_service_id(),
            check_interval: default_check_interval(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Total attempts per generation call, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Exponential backoff multiplier
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Backoff floor in seconds
    #[serde(default = "default_min_backoff_secs")]
    pub min_backoff_secs: u64,
    /// Backoff ceiling in seconds
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            multiplier: default_multiplier(),
            min_backoff_secs: default_min_backoff_secs(),
            max_backoff_secs: default_max_backoff_secs(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: fn() -> T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| GatewayError::Config(format!("invalid value for {}: {}", key, e))),
        Err(_) => Ok(default()),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_api_base() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "gemma2-9b-it".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_enabled() -> bool {
    true
}

fn default_registry_host() -> String {
    "localhost".to_string()
}

fn default_registry_port() -> u16 {
    8500
}

fn default_service_name() -> String {
    "llm-service".to_string()
}

fn default_service_id() -> String {
    "llm-service-1".to_string()
}

fn default_check_interval() -> String {
    "10s".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_min_backoff_secs() -> u64 {
    4
}

fn default_max_backoff_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_provider_defaults() {
        let settings = ProviderSettings::default();
        assert!(settings.api_key.is_none());
        assert_eq!(settings.api_base, "https://api.groq.com/openai/v1");
        assert_eq!(settings.model, "gemma2-9b-it");
        assert_eq!(settings.timeout_secs, 30);
    }

    #[test]
    fn test_registry_defaults() {
        let settings = RegistrySettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.host, "localhost");
        assert_eq!(settings.port, 8500);
        assert_eq!(settings.service_name, "llm-service");
        assert_eq!(settings.service_id, "llm-service-1");
        assert_eq!(settings.check_interval, "10s");
    }

    #[test]
    fn test_retry_defaults() {
        let settings = RetrySettings::default();
        assert_eq!(settings.max_attempts, 3);
        assert!((settings.multiplier - 1.0).abs() < f64::EPSILON);
        assert_eq!(settings.min_backoff_secs, 4);
        assert_eq!(settings.max_backoff_secs, 10);
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.retry.max_attempts, config.retry.max_attempts);
    }
}
