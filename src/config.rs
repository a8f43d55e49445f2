//! Client configuration: where the board server lives.
//!
//! Read from `config.toml` in the user config directory; the `KANRI_API_URL`
//! environment variable overrides the file, and a localhost default covers
//! the common dev setup.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILE: &str = "config.toml";
const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config.toml is invalid: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

/// Load `config.toml` from the config directory; an absent file yields the
/// defaults, a malformed file is an error.
pub fn load_config(config_dir: &Path) -> Result<ClientConfig, ConfigError> {
    let path = config_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(ClientConfig::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Pick the effective API base URL: env override beats the config file.
pub fn resolve_api_url(env_override: Option<String>, config: &ClientConfig) -> String {
    match env_override {
        Some(url) if !url.trim().is_empty() => url,
        _ => config.api_url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn file_value_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "api_url = \"https://board.example.com\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.api_url, "https://board.example.com");
    }

    #[test]
    fn empty_file_falls_back_to_default_url() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "").unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "api_url = [").unwrap();
        assert!(matches!(load_config(dir.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn env_override_beats_config_file() {
        let config = ClientConfig {
            api_url: "https://from-file".into(),
        };
        assert_eq!(
            resolve_api_url(Some("https://from-env".into()), &config),
            "https://from-env"
        );
        assert_eq!(resolve_api_url(None, &config), "https://from-file");
        assert_eq!(resolve_api_url(Some("  ".into()), &config), "https://from-file");
    }
}
