//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the backend base URL, the cookie file location, and the
//! last viewed section.
//!
//! Configuration is stored at `~/.config/sectiondesk/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config directory paths
const APP_NAME: &str = "sectiondesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Cookie file name inside the config directory
const COOKIES_FILE: &str = "cookies.txt";

/// Backend host used when none is configured
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub base_url: Option<String>,
    pub cookies_file: Option<PathBuf>,
    pub last_section: Option<i64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
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

    /// Backend host, resolved from `SECTIONDESK_BASE_URL`, then the config
    /// file, then the development default.
    pub fn resolved_base_url(&self) -> String {
        std::env::var("SECTIONDESK_BASE_URL")
            .ok()
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Cookie file path, defaulting to `cookies.txt` next to the config.
    pub fn cookies_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.cookies_file {
            return Ok(path.clone());
        }
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(COOKIES_FILE))
    }
}
