//! Client configuration.
//!
//! Read from the environment (and a `.env` file when present):
//!
//! - `MEDITRACK_API_BASE_URL`: service root (default: "http://127.0.0.1:5000")
//! - `MEDITRACK_STORAGE_PATH`: SQLite file for local storage (default: in memory)
//! - `MEDITRACK_NOTIFICATION_TTL_SECS`: notification lifetime (default: 3)

use std::path::PathBuf;

use thiserror::Error;

use crate::controller::DEFAULT_NOTIFICATION_TTL_SECS;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    /// `None` keeps local storage in memory
    pub storage_path: Option<PathBuf>,
    pub notification_ttl_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            storage_path: None,
            notification_ttl_secs: DEFAULT_NOTIFICATION_TTL_SECS,
        }
    }
}

impl ClientConfig {
    /// Load `.env` if there is one, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(url) = get("MEDITRACK_API_BASE_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(path) = get("MEDITRACK_STORAGE_PATH") {
            config.storage_path = Some(PathBuf::from(path));
        }
        if let Some(ttl) = get("MEDITRACK_NOTIFICATION_TTL_SECS") {
            config.notification_ttl_secs = ttl.parse().map_err(|_| ConfigError::InvalidValue {
                name: "MEDITRACK_NOTIFICATION_TTL_SECS".into(),
                value: ttl.clone(),
            })?;
        }

        tracing::debug!(?config, "client configuration");
        Ok(config)
    }
}
