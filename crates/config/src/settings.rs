//! Application settings
//!
//! Layered load: built-in defaults, then an optional TOML file, then
//! environment variables. `SHOP_AGENT_SERVER__PORT=8080` overrides
//! `[server] port`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Top-level settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub naturalize: NaturalizeConfig,

    /// Path to the canonical dictionary JSON; built-in seed when absent
    #[serde(default)]
    pub canon_path: Option<String>,

    /// tracing-subscriber env-filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty means allow any
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Per-request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

/// Catalog source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the catalog JSON file; a small built-in sample when absent
    #[serde(default)]
    pub path: Option<String>,

    /// Snapshot time-to-live (seconds)
    #[serde(default = "default_catalog_ttl")]
    pub ttl_seconds: u64,
}

/// Session lifecycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle time before a session is evicted (seconds)
    #[serde(default = "default_max_idle")]
    pub max_idle_seconds: u64,

    /// How often the eviction sweep runs (seconds)
    #[serde(default = "default_eviction_interval")]
    pub eviction_interval_seconds: u64,
}

/// Naturalization collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaturalizeConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Rewrite endpoint, e.g. `http://localhost:9000/naturalize`
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Hard bound on the rewrite round-trip (milliseconds)
    #[serde(default = "default_naturalize_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3100
}
fn default_request_timeout() -> u64 {
    15
}
fn default_catalog_ttl() -> u64 {
    300
}
fn default_max_idle() -> u64 {
    86_400 // 24 hours
}
fn default_eviction_interval() -> u64 {
    600
}
fn default_naturalize_timeout_ms() -> u64 {
    3_000
}
fn default_log_level() -> String {
    "info,tower_http=debug".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            ttl_seconds: default_catalog_ttl(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_idle_seconds: default_max_idle(),
            eviction_interval_seconds: default_eviction_interval(),
        }
    }
}

impl Default for NaturalizeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            timeout_ms: default_naturalize_timeout_ms(),
        }
    }
}

impl Settings {
    /// Sanity checks on values the type system cannot enforce
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "must be non-zero".to_string(),
            });
        }
        if self.catalog.ttl_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "catalog.ttl_seconds".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.session.eviction_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.eviction_interval_seconds".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.naturalize.enabled && self.naturalize.endpoint.is_none() {
            return Err(ConfigError::InvalidValue {
                field: "naturalize.endpoint".to_string(),
                message: "required when naturalize.enabled is true".to_string(),
            });
        }
        Ok(())
    }
}

/// Load settings from an optional file plus the environment
pub fn load_settings(path: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        if !Path::new(path).exists() {
            return Err(ConfigError::FileNotFound(path.to_string()));
        }
        builder = builder.add_source(config::File::with_name(path));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("SHOP_AGENT")
            .separator("__")
            .try_parsing(true),
    );

    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}
