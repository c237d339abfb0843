//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the last used username and the default branch for
//! content uploads.
//!
//! Configuration is stored at `~/.config/octoterm/config.json`. The
//! access token is structurally absent from this type: there is no field
//! for it, so no code path can persist it.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for the config directory path
const APP_NAME: &str = "octoterm";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Branch used for uploads when the operator leaves the field blank
const FALLBACK_BRANCH: &str = "main";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub last_username: Option<String>,
    pub default_branch: Option<String>,
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

    pub fn branch(&self) -> &str {
        self.default_branch.as_deref().unwrap_or(FALLBACK_BRANCH)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_config_has_no_token_field() {
        let config = Config {
            last_username: Some("alice".to_string()),
            default_branch: None,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("token"));
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_branch_fallback() {
        let config = Config::default();
        assert_eq!(config.branch(), "main");

        let config = Config {
            last_username: None,
            default_branch: Some("trunk".to_string()),
        };
        assert_eq!(config.branch(), "trunk");
    }
}
