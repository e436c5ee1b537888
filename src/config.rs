//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub devserver: DevServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Store API the panel talks to
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Where the persisted token lives
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

fn default_storage_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("storeadmin").join("storage.json"))
        .unwrap_or_else(|| PathBuf::from("./storeadmin_storage.json"))
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

/// Development API server
#[derive(Debug, Clone, Deserialize)]
pub struct DevServerConfig {
    #[serde(default = "default_dev_host")]
    pub host: String,

    #[serde(default = "default_dev_port")]
    pub port: u16,

    #[serde(default = "default_admin_email")]
    pub admin_email: String,

    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

fn default_dev_host() -> String {
    "127.0.0.1".to_string()
}

fn default_dev_port() -> u16 {
    5000
}

fn default_admin_email() -> String {
    "admin@example.com".to_string()
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            host: default_dev_host(),
            port: default_dev_port(),
            admin_email: default_admin_email(),
            admin_password: default_admin_password(),
        }
    }
}

impl DevServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("storeadmin").join("config.toml")),
            Some(PathBuf::from("./storeadmin.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("STOREADMIN_API_URL") {
            self.api.base_url = url;
        }

        if let Some(path) = var("STOREADMIN_STORAGE_PATH") {
            self.storage.path = PathBuf::from(path);
        }

        if let Some(host) = var("STOREADMIN_DEV_HOST") {
            self.devserver.host = host;
        }
        if let Some(port) = var("STOREADMIN_DEV_PORT") {
            match port.parse() {
                Ok(p) => self.devserver.port = p,
                Err(_) => tracing::warn!("Ignoring invalid STOREADMIN_DEV_PORT: {}", port),
            }
        }

        if let Some(level) = var("STOREADMIN_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("STOREADMIN_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Store Admin Configuration
#
# Environment variables override these settings:
# - STOREADMIN_API_URL
# - STOREADMIN_STORAGE_PATH
# - STOREADMIN_DEV_HOST
# - STOREADMIN_DEV_PORT
# - STOREADMIN_LOG_LEVEL
# - STOREADMIN_LOG_FORMAT

[api]
# Base URL of the store API
base_url = "http://localhost:5000"

[storage]
# File holding the session token
# path = "~/.local/share/storeadmin/storage.json"

[devserver]
# Development API bind address
host = "127.0.0.1"
port = 5000

# Seeded administrator account
admin_email = "admin@example.com"
admin_password = "admin123"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.devserver.addr(), "127.0.0.1:5000");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.storage.path.ends_with("storage.json"));
    }

    #[test]
    fn test_default_template_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.devserver.admin_email, "admin@example.com");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storeadmin.toml");
        std::fs::write(&path, "[api]\nbase_url = \"https://shop.example.com\"\n").unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.api.base_url, "https://shop.example.com");
        assert_eq!(config.devserver.port, 5000);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Config::load(&missing),
            Err(ConfigError::Io { .. })
        ));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[api\nbase_url = 1").unwrap();
        assert!(matches!(
            Config::load(&broken),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("STOREADMIN_API_URL", "http://api.test:9000"),
            ("STOREADMIN_STORAGE_PATH", "/tmp/token.json"),
            ("STOREADMIN_DEV_PORT", "not-a-port"),
            ("STOREADMIN_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://api.test:9000");
        assert_eq!(config.storage.path, PathBuf::from("/tmp/token.json"));
        assert_eq!(config.devserver.port, 5000);
        assert_eq!(config.logging.format, "json");
    }
}
