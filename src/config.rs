//! Configuration Management
//!
//! Handles persistent configuration storage for sgs and the precedence
//! between command-line flags, environment variables and the config file.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::sgs::client::DEFAULT_TIMEOUT;

pub const ENV_URL: &str = "SGS_URL";
pub const ENV_AUTH_TOKEN: &str = "SGS_AUTH_TOKEN";
pub const ENV_OS_AUTH_TOKEN: &str = "OS_AUTH_TOKEN";
pub const ENV_TIMEOUT: &str = "SGS_TIMEOUT";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Service endpoint
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Pre-issued auth token
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Default output format (`table`, `json` or `yaml`)
    #[serde(default)]
    pub format: Option<String>,
}

impl Config {
    /// Directory holding the config and log files
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sgsclient"))
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                tracing::warn!("Failed to read {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Parse config file content; malformed content yields the defaults
    pub fn parse(content: &str) -> Self {
        match serde_json::from_str(content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring malformed config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Get effective endpoint (CLI > SGS_URL > config)
    pub fn effective_endpoint(&self, cli: Option<&str>) -> Option<String> {
        self.resolve_endpoint(cli, env_var)
    }

    /// Get effective token (CLI > SGS_AUTH_TOKEN > OS_AUTH_TOKEN > config)
    pub fn effective_auth_token(&self, cli: Option<&str>) -> Option<String> {
        self.resolve_auth_token(cli, env_var)
    }

    /// Get effective timeout (CLI > SGS_TIMEOUT > config > 60s)
    pub fn effective_timeout(&self, cli: Option<u64>) -> Duration {
        self.resolve_timeout(cli, env_var)
    }

    fn resolve_endpoint(
        &self,
        cli: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Option<String> {
        cli.map(|s| s.to_string())
            .or_else(|| env(ENV_URL))
            .or_else(|| self.endpoint.clone())
    }

    fn resolve_auth_token(
        &self,
        cli: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Option<String> {
        cli.map(|s| s.to_string())
            .or_else(|| env(ENV_AUTH_TOKEN))
            .or_else(|| env(ENV_OS_AUTH_TOKEN))
            .or_else(|| self.auth_token.clone())
    }

    fn resolve_timeout(&self, cli: Option<u64>, env: impl Fn(&str) -> Option<String>) -> Duration {
        let from_env = || {
            let raw = env(ENV_TIMEOUT)?;
            match raw.trim().parse::<u64>() {
                Ok(secs) => Some(secs),
                Err(_) => {
                    tracing::warn!("Ignoring invalid {}={:?}", ENV_TIMEOUT, raw);
                    None
                }
            }
        };
        cli.or_else(from_env)
            .or(self.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }
}

/// Non-empty environment variable
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn file_config() -> Config {
        Config {
            endpoint: Some("http://file:8975/v1/p".to_string()),
            auth_token: Some("file-token".to_string()),
            timeout_secs: Some(30),
            format: None,
        }
    }

    #[test]
    fn test_cli_beats_env_and_file() {
        let config = file_config();
        let env = env_of(&[(ENV_URL, "http://env:8975/v1/p")]);
        assert_eq!(
            config.resolve_endpoint(Some("http://cli:8975/v1/p"), &env),
            Some("http://cli:8975/v1/p".to_string())
        );
    }

    #[test]
    fn test_env_beats_file() {
        let config = file_config();
        let env = env_of(&[(ENV_URL, "http://env:8975/v1/p"), (ENV_TIMEOUT, "5")]);
        assert_eq!(
            config.resolve_endpoint(None, &env),
            Some("http://env:8975/v1/p".to_string())
        );
        assert_eq!(config.resolve_timeout(None, &env), Duration::from_secs(5));
    }

    #[test]
    fn test_file_used_when_nothing_else_set() {
        let config = file_config();
        let env = env_of(&[]);
        assert_eq!(config.resolve_auth_token(None, &env), Some("file-token".to_string()));
        assert_eq!(config.resolve_timeout(None, &env), Duration::from_secs(30));
    }

    #[test]
    fn test_sgs_token_preferred_over_os_token() {
        let env = env_of(&[(ENV_OS_AUTH_TOKEN, "os"), (ENV_AUTH_TOKEN, "sgs")]);
        assert_eq!(Config::default().resolve_auth_token(None, &env), Some("sgs".to_string()));

        let env = env_of(&[(ENV_OS_AUTH_TOKEN, "os")]);
        assert_eq!(Config::default().resolve_auth_token(None, &env), Some("os".to_string()));
    }

    #[test]
    fn test_default_timeout() {
        let env = env_of(&[(ENV_TIMEOUT, "soon")]);
        assert_eq!(Config::default().resolve_timeout(None, &env), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_parse_partial_and_malformed() {
        let config = Config::parse(r#"{"endpoint": "http://x/v1/p"}"#);
        assert_eq!(config.endpoint.as_deref(), Some("http://x/v1/p"));
        assert_eq!(config.timeout_secs, None);
        assert_eq!(Config::parse("not json"), Config::default());
    }
}
