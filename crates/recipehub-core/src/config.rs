//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which holds the API base URL and the last email used to sign in.
//!
//! Configuration is stored at `~/.config/recipehub/config.json`. The base URL
//! can be overridden with the `RECIPEHUB_API_BASE_URL` environment variable.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "recipehub";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable supplying the API base URL
pub const API_BASE_URL_ENV: &str = "RECIPEHUB_API_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {:?}", path))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Resolve the API base URL: environment first, then the config file.
    ///
    /// Absent both, the empty string keeps request paths relative.
    pub fn api_base_url(&self) -> String {
        let from_env = std::env::var(API_BASE_URL_ENV).ok();
        Self::resolve_base_url(from_env.as_deref(), self.api_base_url.as_deref())
    }

    fn resolve_base_url(from_env: Option<&str>, from_file: Option<&str>) -> String {
        let chosen = from_env
            .filter(|url| !url.trim().is_empty())
            .or(from_file)
            .unwrap_or_default();
        normalize_base_url(chosen)
    }

    /// Directory holding the persisted session entries
    pub fn session_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME).join("session"))
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

/// Trim whitespace and trailing slashes from a base URL.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
