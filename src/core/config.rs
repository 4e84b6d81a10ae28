//! Application configuration management
//!
//! This module handles loading and validating configuration from a TOML file
//! with environment variable overrides. All values are validated at startup.

use crate::core::catalog::PromptKind;
use crate::core::constants::upstream;
use anyhow::{Context, Result, bail, ensure};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default server port
const DEFAULT_PORT: u16 = 3000;

/// Default request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT: u64 = 90;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestConfig {
    /// Upstream timeout in seconds, 0 disables it
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ResponseConfig {
    /// Decode upstream bodies as JSON instead of relaying them as text
    #[serde(default)]
    pub decode_body: bool,
    /// Report a decoded `error` field as an error result
    #[serde(default)]
    pub error_check: bool,
}

fn default_base_api() -> String {
    upstream::DEFAULT_BASE_API.to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    #[serde(default = "default_base_api")]
    pub base_api: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub request: RequestConfig,
    #[serde(default)]
    pub response: ResponseConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream URL template containing a `{}` placeholder
    pub base_api: String,

    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Logging level
    pub log_level: String,

    /// Upstream request timeout in seconds (0 = none)
    pub request_timeout: u64,

    /// Decode upstream bodies before relaying them
    pub decode_body: bool,

    /// Short-circuit decoded bodies carrying an `error` field
    pub error_check: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::from(TomlConfig {
            base_api: default_base_api(),
            server: ServerConfig::default(),
            request: RequestConfig::default(),
            response: ResponseConfig::default(),
        })
    }
}

impl From<TomlConfig> for Config {
    fn from(config: TomlConfig) -> Self {
        Self {
            base_api: config.base_api,
            host: config.server.host,
            port: config.server.port,
            log_level: config.server.log_level,
            request_timeout: config.request.request_timeout,
            decode_body: config.response.decode_body,
            error_check: config.response.error_check,
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: TomlConfig =
            toml::from_str(content).context("Failed to parse TOML configuration")?;
        Ok(Self::from(config))
    }

    /// Load configuration from TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed. Call
    /// [`Config::validate`] once overrides have been applied.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read configuration file")?;
        Self::parse(&content)
    }

    /// Load configuration from `CONFIG_PATH` (default `config.toml`) and apply
    /// environment overrides
    ///
    /// A missing file falls back to the built-in defaults.
    pub fn from_env() -> Result<Self> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
                .with_context(|| format!("Failed to load {}", config_path))?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override values from `HOST`, `PORT`, `BASE_API`, `LOG_LEVEL` and
    /// `REQUEST_TIMEOUT`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {}", port))?;
        }
        if let Some(base_api) = lookup("BASE_API") {
            self.base_api = base_api;
        }
        if let Some(log_level) = lookup("LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Some(timeout) = lookup("REQUEST_TIMEOUT") {
            self.request_timeout = timeout
                .trim()
                .parse()
                .with_context(|| format!("Invalid REQUEST_TIMEOUT value: {}", timeout))?;
        }
        Ok(())
    }

    /// Check that the base template has a placeholder and yields an http(s) URL
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.base_api.contains(upstream::PLACEHOLDER),
            "base_api must contain a {} placeholder: {}",
            upstream::PLACEHOLDER,
            self.base_api
        );

        let sample = self.upstream_url(PromptKind::Chat);
        let url = reqwest::Url::parse(&sample)
            .with_context(|| format!("base_api is not a valid URL: {}", self.base_api))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("base_api must use http or https: {}", self.base_api);
        }
        Ok(())
    }

    /// Upstream URL for a request kind, first placeholder substituted
    pub fn upstream_url(&self, kind: PromptKind) -> String {
        kind.url(&self.base_api)
    }

    /// Upstream timeout, `None` when disabled
    pub fn timeout(&self) -> Option<Duration> {
        (self.request_timeout > 0).then(|| Duration::from_secs(self.request_timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_config() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            base_api = "http://localhost:9000/v1/{{}}"

            [server]
            host = "127.0.0.1"
            port = 8080
            log_level = "debug"

            [request]
            request_timeout = 15

            [response]
            decode_body = true
        "#
        )
        .unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_config() {
        let file = create_test_config();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.base_api, "http://localhost:9000/v1/{}");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
        assert!(config.decode_body);
        assert!(!config.error_check);
    }

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.base_api, "https://api.biswax.dev/{}");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.request_timeout, 90);
        assert!(!config.decode_body);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_upstream_url() {
        let config = Config::default();
        assert_eq!(
            config.upstream_url(PromptKind::Chat),
            "https://api.biswax.dev/chat"
        );
        assert_eq!(
            config.upstream_url(PromptKind::Image),
            "https://api.biswax.dev/image"
        );
    }

    #[test]
    fn test_only_first_placeholder_replaced() {
        let config = Config {
            base_api: "https://example.com/{}/{}".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.upstream_url(PromptKind::Chat),
            "https://example.com/chat/{}"
        );
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PORT", "4100"),
            ("BASE_API", "http://127.0.0.1:1/{}"),
            ("REQUEST_TIMEOUT", "0"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.port, 4100);
        assert_eq!(config.base_api, "http://127.0.0.1:1/{}");
        assert_eq!(config.timeout(), None);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_port_override() {
        let mut config = Config::default();
        let result = config.apply_overrides(|key| (key == "PORT").then(|| "http".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_templates() {
        let missing = Config {
            base_api: "https://api.biswax.dev/chat".to_string(),
            ..Config::default()
        };
        assert!(missing.validate().is_err());

        let scheme = Config {
            base_api: "ftp://api.biswax.dev/{}".to_string(),
            ..Config::default()
        };
        assert!(scheme.validate().is_err());

        let garbage = Config {
            base_api: "not a url {}".to_string(),
            ..Config::default()
        };
        assert!(garbage.validate().is_err());
    }
}
