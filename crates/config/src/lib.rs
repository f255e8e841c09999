//! Configuration management for the shopping assistant
//!
//! Settings load from an optional TOML file layered with environment
//! variables (`SHOP_AGENT_` prefix, `__` section separator). The canon
//! store persists the canonical dictionary as JSON so admin edits
//! survive restarts.

pub mod canon_store;
pub mod settings;

pub use canon_store::{CanonFile, CanonStore};
pub use settings::{
    load_settings, CatalogConfig, NaturalizeConfig, ServerConfig, SessionConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
