//! Configuration Management
//!
//! Persistent defaults for the function runner.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Address the server listens on when nothing else is configured
pub const DEFAULT_ADDRESS: &str = "0.0.0.0:9443";

/// Document format for one-shot runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

/// Runner configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Listen address for `serve`
    #[serde(default)]
    pub address: Option<String>,
    /// Request/response format for `run`
    #[serde(default)]
    pub format: Option<Format>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("function-xbuckets").join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Cannot read config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Get effective listen address (CLI > config > default)
    pub fn effective_address(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.address.clone())
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string())
    }

    /// Get effective document format (CLI > config > default)
    pub fn effective_format(&self, cli: Option<Format>) -> Format {
        cli.or(self.format).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "function-xbuckets-{}-{}",
            name,
            uuid::Uuid::new_v4()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_config_path_is_under_function_dir() {
        if let Some(path) = Config::config_path() {
            assert!(path.ends_with("function-xbuckets/config.json"));
        }
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = scratch_dir("missing");
        assert_eq!(Config::load_from(&dir.join("config.json")), Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = scratch_dir("load");
        let path = dir.join("config.json");
        std::fs::write(&path, r#"{"address": "127.0.0.1:9000", "format": "yaml"}"#).unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.address.as_deref(), Some("127.0.0.1:9000"));
        assert_eq!(config.format, Some(Format::Yaml));
    }

    #[test]
    fn test_invalid_file_yields_defaults() {
        let dir = scratch_dir("invalid");
        let path = dir.join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_precedence() {
        let config = Config {
            address: Some("10.0.0.1:1234".to_string()),
            format: Some(Format::Yaml),
        };
        assert_eq!(config.effective_address(Some("127.0.0.1:1")), "127.0.0.1:1");
        assert_eq!(config.effective_address(None), "10.0.0.1:1234");
        assert_eq!(Config::default().effective_address(None), DEFAULT_ADDRESS);

        assert_eq!(config.effective_format(Some(Format::Json)), Format::Json);
        assert_eq!(config.effective_format(None), Format::Yaml);
        assert_eq!(Config::default().effective_format(None), Format::Json);
    }
}
