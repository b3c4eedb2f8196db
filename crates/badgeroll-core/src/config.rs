//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the remote project URL, the request timeout and the country prefix used
//! for QR payloads. The access key is never written here; it comes from the
//! environment or the OS keychain (see `auth::CredentialStore`).
//!
//! Configuration is stored at `~/.config/badgeroll/config.json`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::CredentialStore;
use crate::utils::DEFAULT_COUNTRY_PREFIX;

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "badgeroll";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the remote project URL
pub const ENV_REMOTE_URL: &str = "BADGEROLL_REMOTE_URL";

/// Environment variable carrying the access key
pub const ENV_API_KEY: &str = "BADGEROLL_API_KEY";

/// HTTP request timeout in seconds.
/// Single request/response calls; fail fast rather than hang the form.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub remote_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub country_prefix: Option<String>,
}

/// Everything needed to reach the remote table.
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Self = serde_json::from_str(&contents).context("Failed to parse config file")?;
            Ok(config)
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

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn country_prefix(&self) -> &str {
        self.country_prefix
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_COUNTRY_PREFIX)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|&secs| secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Remote URL, environment first
    pub fn remote_url(&self) -> Option<String> {
        non_empty(std::env::var(ENV_REMOTE_URL).ok()).or_else(|| non_empty(self.remote_url.clone()))
    }

    /// Access key, environment first, then the keychain entry for the remote URL
    pub fn api_key(&self) -> Option<String> {
        if let Some(key) = non_empty(std::env::var(ENV_API_KEY).ok()) {
            return Some(key);
        }
        let url = self.remote_url()?;
        match CredentialStore::get_api_key(&url) {
            Ok(key) => non_empty(Some(key)),
            Err(e) => {
                warn!(error = %e, "No access key in keychain");
                None
            }
        }
    }

    /// Resolve the remote settings, or `None` when the remote is not set up.
    /// Both URL and key must be present and non-blank.
    pub fn remote_settings(&self) -> Option<RemoteSettings> {
        Self::settings_from(self.remote_url(), self.api_key(), self.request_timeout())
    }

    fn settings_from(url: Option<String>, api_key: Option<String>, timeout: Duration) -> Option<RemoteSettings> {
        Some(RemoteSettings {
            url: non_empty(url)?,
            api_key: non_empty(api_key)?,
            timeout,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config: Config = serde_json::from_str(r#"{"remote_url": "https://abc.supabase.co"}"#).unwrap();
        assert_eq!(config.remote_url.as_deref(), Some("https://abc.supabase.co"));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.country_prefix(), "+225");
    }

    #[test]
    fn test_timeout_and_prefix_overrides() {
        let config = Config {
            remote_url: None,
            request_timeout_secs: Some(3),
            country_prefix: Some("+33".to_string()),
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.country_prefix(), "+33");

        let zero = Config {
            request_timeout_secs: Some(0),
            country_prefix: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(zero.request_timeout(), Duration::from_secs(10));
        assert_eq!(zero.country_prefix(), "+225");
    }

    #[test]
    fn test_settings_require_url_and_key() {
        let timeout = Duration::from_secs(10);
        assert!(Config::settings_from(None, Some("key".into()), timeout).is_none());
        assert!(Config::settings_from(Some("https://x".into()), None, timeout).is_none());
        assert!(Config::settings_from(Some("https://x".into()), Some("   ".into()), timeout).is_none());

        let settings = Config::settings_from(Some(" https://x ".into()), Some("key".into()), timeout).unwrap();
        assert_eq!(settings.url, "https://x");
        assert_eq!(settings.api_key, "key");
    }
}
