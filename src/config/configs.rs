use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{defaults, envconfig::EnvConfig, validate};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub upstream: UpstreamConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }
}

impl EnvConfig for AppConfig {
    fn overrides(
        builder: ::config::ConfigBuilder<::config::builder::DefaultState>,
    ) -> Result<::config::ConfigBuilder<::config::builder::DefaultState>> {
        // Bare variables kept for deployments that predate the APP_ prefix.
        let production = std::env::var("PROD")
            .ok()
            .map(|raw| matches!(raw.to_ascii_lowercase().as_str(), "true" | "1" | "yes"));
        let access_key = std::env::var("UNSPLASH_ACCESS_KEY").ok();

        Ok(builder
            .set_override_option("general.production", production)?
            .set_override_option("upstream.image_access_key", access_key)?)
    }

    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    pub host: String,
    pub port: u16,
    pub production: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT,
            production: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub rust_log: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_idle: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: defaults::DEFAULT_DATABASE_URL.to_string(),
            max_connections: defaults::DEFAULT_DB_MAX_CONNECTIONS,
            min_idle: defaults::DEFAULT_DB_MIN_IDLE,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: defaults::DEV_SESSION_SECRET.to_string(),
            ttl_hours: defaults::DEFAULT_SESSION_TTL_HOURS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpstreamConfig {
    pub activity_url: String,
    pub image_url: String,
    pub image_access_key: String,
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            activity_url: defaults::DEFAULT_ACTIVITY_URL.to_string(),
            image_url: defaults::DEFAULT_IMAGE_URL.to_string(),
            image_access_key: String::new(),
            timeout_secs: defaults::DEFAULT_UPSTREAM_TIMEOUT_SECS,
        }
    }
}
