//! Client configuration management.
//!
//! Configuration is stored at `~/.config/summeet/config.json`; a missing
//! file means defaults. Environment variables override the file:
//!
//! - `SUMMEET_API_BASE_URL`: API base, absolute or a path such as `/api`
//! - `SUMMEET_ORIGIN`: origin a relative base is resolved against
//! - `SUMMEET_CREDENTIAL_STORE`: `file`, `keyring` or `memory`

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::ApiError;
use crate::auth::{FileStore, KeyringStore, MemoryStore, TokenStore};

/// Application name used for config/credential directory paths
const APP_NAME: &str = "summeet";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_API_BASE_URL: &str = "/api";

/// Dev server that proxies `/api` to the backend
pub const DEFAULT_ORIGIN: &str = "http://localhost:5173";

const ENV_API_BASE_URL: &str = "SUMMEET_API_BASE_URL";
const ENV_ORIGIN: &str = "SUMMEET_ORIGIN";
const ENV_CREDENTIAL_STORE: &str = "SUMMEET_CREDENTIAL_STORE";

/// Where the token manager persists credentials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

impl FromStr for CredentialBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(CredentialBackend::File),
            "keyring" => Ok(CredentialBackend::Keyring),
            "memory" => Ok(CredentialBackend::Memory),
            other => Err(format!("unknown credential store '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub origin: String,
    /// Per-request timeout; `None` keeps the transport default
    pub timeout_secs: Option<u64>,
    pub credential_store: CredentialBackend,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            timeout_secs: None,
            credential_store: CredentialBackend::default(),
        }
    }
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&Self::config_path()?)?;
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Read settings as stored on disk, without environment overrides.
    pub fn load_stored() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Persist settings to the user's config file, returning its path.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        // Catch a bad base URL now rather than on the next run
        self.resolved_base_url()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }

    /// Config pointing straight at an absolute base URL, credentials in memory.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            credential_store: CredentialBackend::Memory,
            ..Self::default()
        }
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = base;
        }
        if let Some(origin) = lookup(ENV_ORIGIN).filter(|v| !v.trim().is_empty()) {
            self.origin = origin;
        }
        if let Some(backend) = lookup(ENV_CREDENTIAL_STORE) {
            match backend.parse::<CredentialBackend>() {
                Ok(backend) => self.credential_store = backend,
                Err(e) => warn!("Ignoring {}: {}", ENV_CREDENTIAL_STORE, e),
            }
        }
        self
    }

    /// Absolute API base URL without a trailing slash.
    ///
    /// A base starting with `/` is resolved against `origin`.
    pub fn resolved_base_url(&self) -> std::result::Result<String, ApiError> {
        let base = self.api_base_url.trim();
        let candidate = if base.starts_with("http://") || base.starts_with("https://") {
            base.to_string()
        } else if base.starts_with('/') {
            format!("{}{}", self.origin.trim().trim_end_matches('/'), base)
        } else {
            return Err(ApiError::InvalidConfig(format!(
                "API base URL must be absolute or start with '/': {:?}",
                self.api_base_url
            )));
        };

        reqwest::Url::parse(&candidate)
            .map_err(|e| ApiError::InvalidConfig(format!("{}: {}", candidate, e)))?;
        Ok(candidate.trim_end_matches('/').to_string())
    }

    /// Open the configured credential store.
    pub fn open_store(&self) -> Result<Arc<dyn TokenStore>> {
        let store: Arc<dyn TokenStore> = match self.credential_store {
            CredentialBackend::File => Arc::new(FileStore::new(Self::credential_dir()?)),
            CredentialBackend::Keyring => Arc::new(KeyringStore::new()),
            CredentialBackend::Memory => Arc::new(MemoryStore::new()),
        };
        Ok(store)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the file-backed session.
    pub fn credential_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_base_is_api_under_origin() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "/api");
        assert_eq!(
            config.resolved_base_url().unwrap(),
            "http://localhost:5173/api"
        );
    }

    #[test]
    fn test_env_overrides_base_url() {
        let config = Config::default().with_overrides(env(&[
            ("SUMMEET_API_BASE_URL", "https://summeet.example.com/v1/"),
            ("SUMMEET_CREDENTIAL_STORE", "Keyring"),
        ]));
        assert_eq!(
            config.resolved_base_url().unwrap(),
            "https://summeet.example.com/v1"
        );
        assert_eq!(config.credential_store, CredentialBackend::Keyring);
    }

    #[test]
    fn test_blank_or_invalid_overrides_are_ignored() {
        let config = Config::default().with_overrides(env(&[
            ("SUMMEET_API_BASE_URL", "  "),
            ("SUMMEET_CREDENTIAL_STORE", "floppy"),
        ]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_relative_base_uses_origin() {
        let config = Config {
            origin: "http://127.0.0.1:8000/".into(),
            ..Config::default()
        }
        .with_overrides(env(&[("SUMMEET_API_BASE_URL", "/")]));
        assert_eq!(config.resolved_base_url().unwrap(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_bad_base_url_is_rejected() {
        let config = Config::for_base_url("api.example.com");
        assert!(matches!(
            config.resolved_base_url(),
            Err(ApiError::InvalidConfig(_))
        ));

        let config = Config::for_base_url("http://");
        assert!(matches!(
            config.resolved_base_url(),
            Err(ApiError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_partial_config_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"timeout_secs": 10}"#).unwrap();
        assert_eq!(config.timeout_secs, Some(10));
        assert_eq!(config.api_base_url, "/api");
        assert_eq!(config.credential_store, CredentialBackend::File);
    }

    #[test]
    fn test_saved_config_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summeet").join("config.json");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        let config = Config {
            api_base_url: "https://summeet.example.com/api".into(),
            timeout_secs: Some(30),
            credential_store: CredentialBackend::Keyring,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_save_rejects_unusable_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config {
            api_base_url: "api.example.com".into(),
            ..Config::default()
        };

        assert!(config.save_to(&path).is_err());
        assert!(!path.exists());
    }
}
