use offle_core::{OffleError, OffleResult};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Environment variable overriding [`ClientConfig::base_url`].
pub const BASE_URL_ENV: &str = "OFFLE_API_BASE_URL";
/// Environment variable overriding [`ClientConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "OFFLE_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Keep and resend cookies the backend sets.
    #[serde(default = "default_with_credentials")]
    pub with_credentials: bool,
    /// Where the session file lives.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_with_credentials() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            with_credentials: default_with_credentials(),
            data_dir: default_data_dir(),
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(s: &str) -> OffleResult<Self> {
        toml::from_str(s).map_err(|e| OffleError::Config(e.to_string()))
    }

    /// Reads a TOML config file. A missing file yields the defaults.
    pub async fn load(path: &Path) -> OffleResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            OffleError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Applies `OFFLE_API_BASE_URL` / `OFFLE_DATA_DIR` from the process environment.
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    pub fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        self
    }

    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    /// Parses and validates [`Self::base_url`].
    pub fn parsed_base_url(&self) -> OffleResult<Url> {
        let url = Url::parse(self.base_url.trim())
            .map_err(|e| OffleError::Config(format!("invalid base_url '{}': {}", self.base_url, e)))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(OffleError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        Ok(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert!(config.with_credentials);
        assert_eq!(config.session_file(), PathBuf::from("./data/session.json"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ClientConfig::from_toml_str(r#"base_url = "https://offle.example""#).unwrap();
        assert_eq!(config.base_url, "https://offle.example");
        assert!(config.with_credentials);
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let result = ClientConfig::from_toml_str("base_url = [");
        assert!(matches!(result, Err(OffleError::Config(_))));
    }

    #[test]
    fn test_env_overrides_file() {
        let config = ClientConfig::default().apply_env_from(|key| match key {
            BASE_URL_ENV => Some("http://api:9000".to_string()),
            DATA_DIR_ENV => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.base_url, "http://api:9000");
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_base_url_validation() {
        let mut config = ClientConfig::default();
        assert!(config.parsed_base_url().is_ok());
        config.base_url = "ftp://files".to_string();
        assert!(config.parsed_base_url().is_err());
        config.base_url = "not a url".to_string();
        assert!(config.parsed_base_url().is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(&tmp.path().join("offle.toml")).await.unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
