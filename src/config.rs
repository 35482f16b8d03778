//! Configuration.
//!
//! Loaded from `<config dir>/nimbus-term/config.toml` when present,
//! otherwise defaults. `NIMBUS_API_URL` overrides the backend origin so a
//! session can be pointed at another deployment without editing the file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Origin of the storage backend, e.g. `http://127.0.0.1:8000`.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Timeout for a single backend request, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// How long the upload file prompt waits before it counts as
    /// cancelled, in seconds.
    #[serde(default = "default_picker_timeout")]
    pub picker_timeout_secs: u64,

    /// Where `download` writes files. Defaults to the platform download
    /// directory, then the process working directory.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_picker_timeout() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout(),
            picker_timeout_secs: default_picker_timeout(),
            download_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                toml::from_str(&content)
                    .with_context(|| format!("failed to parse {}", path.display()))?
            }
            _ => Self::default(),
        };

        if let Ok(url) = std::env::var("NIMBUS_API_URL") {
            if !url.trim().is_empty() {
                config.api_base_url = url;
            }
        }

        Ok(config)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nimbus-term").join("config.toml"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn picker_timeout(&self) -> Duration {
        Duration::from_secs(self.picker_timeout_secs)
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.picker_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("api_base_url = \"https://drive.example\"").unwrap();
        assert_eq!(config.api_base_url, "https://drive.example");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.download_dir.is_none());
    }
}
