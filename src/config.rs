// Configuration management.
//
// Settings live in the platform config directory
// (`~/.config/leafscan/config.json` on Linux) and every field has a
// default, so a missing or unreadable file is never fatal.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Where the detection service lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    /// Language preselected in the UI.
    #[serde(default = "default_language")]
    pub default_language: String,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: EndpointConfig::default(),
            default_language: default_language(),
        }
    }
}

fn config_path() -> Result<PathBuf, String> {
    let dir = dirs::config_dir().ok_or("Could not determine config directory")?;
    Ok(dir.join("leafscan").join("config.json"))
}

/// Load configuration from disk.
/// Returns default config if the file doesn't exist or is invalid.
pub fn load_config() -> AppConfig {
    let path = match config_path() {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!("failed to resolve config path: {}", e);
            return AppConfig::default();
        }
    };

    if !path.exists() {
        tracing::debug!("no config file at {:?}, using defaults", path);
        return AppConfig::default();
    }

    match fs::read_to_string(&path) {
        Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("failed to parse {:?}: {}. Using defaults.", path, e);
                AppConfig::default()
            }
        },
        Err(e) => {
            tracing::warn!("failed to read {:?}: {}. Using defaults.", path, e);
            AppConfig::default()
        }
    }
}

/// Save configuration to disk, creating the config directory if needed.
pub fn save_config(config: &AppConfig) -> Result<(), String> {
    let path = config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    fs::write(&path, json).map_err(|e| format!("Failed to write config file: {}", e))?;

    tracing::info!("saved config to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.endpoint.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.default_language, "en");
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = AppConfig::default();
        config.endpoint.base_url = "http://10.0.0.5:9000".to_string();
        config.default_language = "te".to_string();

        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.endpoint.base_url, "http://10.0.0.5:9000");
        assert_eq!(parsed.default_language, "te");
    }

    #[test]
    fn test_config_tolerates_missing_fields() {
        let parsed: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.endpoint.base_url, "http://127.0.0.1:8000");
        assert_eq!(parsed.default_language, "en");

        let parsed: AppConfig =
            serde_json::from_str(r#"{"default_language":"hi"}"#).unwrap();
        assert_eq!(parsed.default_language, "hi");
        assert_eq!(parsed.endpoint.base_url, "http://127.0.0.1:8000");
    }
}
