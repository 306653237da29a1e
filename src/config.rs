use std::{
    net::{IpAddr, SocketAddr},
    time::Duration,
};

use anyhow::Context;
use config::{self, Config, Environment};
use dotenvy::dotenv;
use serde::Deserialize;
use serde_with::serde_as;
use url::Url;

#[serde_as]
#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    // --- Server ---
    /// APP_HOST - bind host (default `0.0.0.0`)
    #[serde(default = "default_app_host")]
    pub app_host: String,
    /// APP_PORT - bind port (default `5000`)
    #[serde(default = "default_app_port")]
    pub app_port: u16,
    /// APP_DEBUG - debug mode, forces the `debug` log filter (default `false`)
    #[serde(default)]
    pub app_debug: bool,

    // --- Redis ---
    /// REDIS_URL - Redis connection string (required)
    pub redis_url: Url,
    /// REDIS_POOL_SIZE - maximum number of pooled Redis connections (default `16`)
    #[serde(default = "default_redis_pool_size")]
    pub redis_pool_size: usize,
    /// REDIS_POOL_TIMEOUT_SECS - wait/create timeout for pooled connections (default `5`)
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    #[serde(default = "default_redis_pool_timeout_secs")]
    pub redis_pool_timeout_secs: Duration,

    // --- CORS ---
    /// CORS_ENABLED - enable CORS middleware (default `true`)
    #[serde(default = "default_cors_enabled")]
    pub cors_enabled: bool,
    /// CORS_ALLOWED_ORIGINS - list of allowed CORS origins (default `["*"]`)
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,

    // --- Logging ---
    /// LOG_FORMAT - log format (default `json`)
    #[serde(default)]
    pub log_format: LogFormat,
    /// RUST_LOG - Rust log level (default `"info"`)
    #[serde(default = "default_rust_log")]
    pub rust_log: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Plain,
    #[default]
    Json,
}

fn default_app_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_app_port() -> u16 {
    5000
}

const fn default_redis_pool_size() -> usize {
    16
}

const fn default_redis_pool_timeout_secs() -> Duration {
    Duration::from_secs(5)
}

const fn default_cors_enabled() -> bool {
    true
}

fn default_cors_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_rust_log() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();

        let settings = Config::builder()
            .add_source(
                Environment::default()
                    .try_parsing(true)
                    .ignore_empty(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins"),
            )
            .build()?;

        let cfg = settings.try_deserialize::<AppConfig>()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate cross-field invariants.
    pub fn validate(&self) -> anyhow::Result<()> {
        match self.redis_url.scheme() {
            "redis" | "rediss" | "redis+unix" | "unix" => {}
            other => anyhow::bail!("Unsupported REDIS_URL scheme: {}", other),
        }

        if self.redis_pool_size == 0 {
            anyhow::bail!("REDIS_POOL_SIZE must be > 0");
        }

        if self.redis_pool_timeout_secs.is_zero() {
            anyhow::bail!("REDIS_POOL_TIMEOUT_SECS must be > 0");
        }

        // CORS origins must be "*" or valid URLs
        for origin in &self.cors_allowed_origins {
            if origin != "*" {
                url::Url::parse(origin)
                    .with_context(|| format!("Invalid CORS origin: {}", origin))?;
            }
        }

        Ok(())
    }

    /// Log filter directive in effect; debug mode overrides RUST_LOG from config.
    pub fn log_filter(&self) -> &str {
        if self.app_debug {
            "debug"
        } else {
            self.rust_log.as_str()
        }
    }

    /// Build a SocketAddr for listening from APP_HOST and APP_PORT.
    pub async fn to_socket_addr(&self) -> anyhow::Result<SocketAddr> {
        if let Ok(ip) = self.app_host.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.app_port));
        }

        tokio::net::lookup_host((self.app_host.as_str(), self.app_port))
            .await
            .with_context(|| format!("Failed to resolve {}:{}", self.app_host, self.app_port))?
            .next()
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No addresses resolved for {}:{}",
                    self.app_host,
                    self.app_port
                )
            })
    }
}
