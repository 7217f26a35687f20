//! Configuration management for Movieflix
//!
//! Config is stored at ~/.config/movieflix/config.toml. The API base URL is
//! resolved as: `--api-url` flag, then `MOVIEFLIX_API_URL`, then the file,
//! then the built-in default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::api::{ApiClient, DEFAULT_API_URL};
use crate::session::{RouteGuard, SessionContext};

pub const API_URL_ENV: &str = "MOVIEFLIX_API_URL";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// API gateway base URL
    pub api_url: Option<String>,
    /// Per-request timeout; unset means no timeout
    pub request_timeout_secs: Option<u64>,
    /// Refuse protected screens once a JWT credential has expired
    #[serde(default)]
    pub enforce_token_expiry: bool,
    /// tracing filter directive, e.g. "movieflix=debug"
    pub log_filter: Option<String>,
}

impl Config {
    /// Get config file path (~/.config/movieflix/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("movieflix").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Load an explicitly named config file; a bad file is an error
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Base URL with flag > env > file > default precedence
    pub fn api_url(&self, flag: Option<&str>) -> String {
        let env = std::env::var(API_URL_ENV).ok();
        resolve_api_url(flag, env.as_deref(), self.api_url.as_deref())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
    }

    /// HTTP client for the resolved base URL
    pub fn client(&self, session: Arc<SessionContext>, api_url_flag: Option<&str>) -> ApiClient {
        let client = ApiClient::new(self.api_url(api_url_flag), session);
        match self.request_timeout() {
            Some(timeout) => client.with_timeout(timeout),
            None => client,
        }
    }

    pub fn guard(&self) -> RouteGuard {
        RouteGuard::from_config(self.enforce_token_expiry)
    }
}

fn resolve_api_url(flag: Option<&str>, env: Option<&str>, file: Option<&str>) -> String {
    [flag, env, file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.api_url.is_none());
        assert!(config.request_timeout().is_none());
        assert!(!config.enforce_token_expiry);
    }

    #[test]
    fn test_api_url_precedence() {
        assert_eq!(
            resolve_api_url(Some("http://flag/api"), Some("http://env/api"), Some("http://file/api")),
            "http://flag/api"
        );
        assert_eq!(
            resolve_api_url(None, Some("http://env/api"), Some("http://file/api")),
            "http://env/api"
        );
        assert_eq!(resolve_api_url(None, Some(""), Some("http://file/api")), "http://file/api");
        assert_eq!(resolve_api_url(None, None, None), DEFAULT_API_URL);
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let config = Config {
            request_timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(config.request_timeout().is_none());

        let config = Config {
            request_timeout_secs: Some(15),
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movieflix").join("config.toml");
        let config = Config {
            api_url: Some("http://localhost:8080/api".into()),
            request_timeout_secs: Some(10),
            enforce_token_expiry: true,
            log_filter: Some("movieflix=debug".into()),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_url = \"http://gateway/api\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://gateway/api"));
        assert!(!config.enforce_token_expiry);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(&dir.path().join("nope.toml")).is_err());
    }
}
