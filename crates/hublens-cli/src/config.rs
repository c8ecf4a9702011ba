//! CLI configuration.
//!
//! Precedence, lowest to highest: config file, `HUBLENS_ORIGIN` environment
//! variable, `--origin` flag. The file is TOML; an explicitly passed path
//! must exist, the default path is optional.

use anyhow::{Context, Result};
use hublens_client::HubConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable overriding the configured origin.
pub const ORIGIN_ENV: &str = "HUBLENS_ORIGIN";

/// On-disk CLI configuration.
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Hub origin, e.g. `https://hub.example.com`.
    pub origin: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Page-size override for list fetches.
    pub page_size: Option<u32>,
}

impl AppConfig {
    /// Loads configuration, applying env and flag overrides.
    pub fn load(path: Option<&Path>, origin_flag: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        if let Ok(origin) = std::env::var(ORIGIN_ENV) {
            config.origin = Some(origin);
        }
        if let Some(origin) = origin_flag {
            config.origin = Some(origin.to_string());
        }
        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config in {}", path.display()))
    }

    fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".config/hublens/config.toml"))
    }

    /// Converts into the client configuration.
    pub fn into_hub_config(self) -> Result<HubConfig> {
        let mut hub = HubConfig::default();
        if let Some(origin) = self.origin {
            hub.origin = Some(
                Url::parse(&origin).with_context(|| format!("invalid Hub origin {origin}"))?,
            );
        }
        if let Some(timeout_secs) = self.timeout_secs {
            hub.timeout_secs = timeout_secs;
        }
        if let Some(page_size) = self.page_size {
            hub.page_size = page_size;
        }
        Ok(hub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "origin = \"https://hub.example.com\"\npage_size = 500").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.origin.as_deref(), Some("https://hub.example.com"));
        assert_eq!(config.page_size, Some(500));
    }

    #[test]
    fn test_flag_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "origin = \"https://file.example.com\"").unwrap();

        let config =
            AppConfig::load(Some(file.path()), Some("https://flag.example.com")).unwrap();
        assert_eq!(config.origin.as_deref(), Some("https://flag.example.com"));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "origin = \"https://file.example.com\"").unwrap();

        // The flag outranks the env var, so the only other test touching
        // ORIGIN_ENV precedence (test_flag_overrides_file) cannot be
        // perturbed by this variable being set concurrently.
        std::env::set_var(ORIGIN_ENV, "https://env.example.com");
        let config = AppConfig::load(Some(file.path()), None).unwrap();
        std::env::remove_var(ORIGIN_ENV);

        assert_eq!(config.origin.as_deref(), Some("https://env.example.com"));
    }

    #[test]
    fn test_into_hub_config() {
        let config = AppConfig {
            origin: Some("https://hub.example.com".to_string()),
            timeout_secs: Some(5),
            page_size: None,
        };
        let hub = config.into_hub_config().unwrap();
        assert!(hub.origin.is_some());
        assert_eq!(hub.timeout_secs, 5);
        assert_eq!(hub.page_size, 10000);
    }

    #[test]
    fn test_into_hub_config_rejects_bad_origin() {
        let config = AppConfig {
            origin: Some("not a url".to_string()),
            timeout_secs: None,
            page_size: None,
        };
        assert!(config.into_hub_config().is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(AppConfig::from_file(Path::new("/nonexistent/hublens.toml")).is_err());
    }
}
