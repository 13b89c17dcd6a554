//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dev host configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the built UI bundle (`index.html` + wasm)
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8084
}

fn default_static_dir() -> String {
    "./ecoinsight-ui/dist".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Prediction backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Base URL of the prediction API; paths start with `/api/...`
    #[serde(default = "default_backend_url")]
    pub url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Unset means `info` for the host and `warn` for one-shot commands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Log level when none is configured
pub const DEFAULT_LOG_LEVEL: &str = "info";

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Use `level` unless the file or environment already chose one
    pub fn set_default_level(&mut self, level: &str) {
        self.level.get_or_insert_with(|| level.to_string());
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
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
        for path in Self::default_paths() {
            if path.exists() {
                match Self::load_with_env(&path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Config file locations, highest priority first
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("ecoinsight").join("config.toml")),
            Some(PathBuf::from("/etc/ecoinsight/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(host) = var("ECOINSIGHT_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("ECOINSIGHT_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!("Ignoring invalid ECOINSIGHT_PORT {:?}", port),
            }
        }
        if let Some(dir) = var("ECOINSIGHT_STATIC_DIR") {
            self.server.static_dir = dir;
        }

        // Backend overrides
        if let Some(url) = var("ECOINSIGHT_BACKEND_URL") {
            self.backend.url = url;
        }

        // Logging overrides
        if let Some(level) = var("ECOINSIGHT_LOG_LEVEL") {
            self.logging.level = Some(level);
        }
        if let Some(format) = var("ECOINSIGHT_LOG_FORMAT") {
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
    r#"# EcoInsight Configuration
#
# Environment variables override these settings:
# - ECOINSIGHT_HOST
# - ECOINSIGHT_PORT
# - ECOINSIGHT_STATIC_DIR
# - ECOINSIGHT_BACKEND_URL
# - ECOINSIGHT_LOG_LEVEL
# - ECOINSIGHT_LOG_FORMAT

[server]
# Address the dev host binds to
host = "127.0.0.1"
port = 8084

# Built UI bundle served at /
static_dir = "./ecoinsight-ui/dist"

# Extra CORS origins allowed to call /api (empty = same origin only)
cors_origins = []

[backend]
# Prediction API that /api/* is forwarded to
url = "http://localhost:5000"

# Timeout for forwarded and CLI requests (seconds)
request_timeout_secs = 30

[logging]
# Log level: trace, debug, info, warn, error
# Unset: info for `serve`, warn for the other commands
# level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.addr(), "127.0.0.1:8084");
        assert_eq!(config.backend.url, "http://localhost:5000");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        let defaults = Config::default();
        assert_eq!(config.server.port, defaults.server.port);
        assert_eq!(config.server.static_dir, defaults.server.static_dir);
        assert_eq!(config.backend.url, defaults.backend.url);
        assert_eq!(config.logging.level, defaults.logging.level);
    }

    #[test]
    fn test_default_level_keeps_configured_level() {
        let mut config = Config::parse("[logging]\nlevel = \"debug\"").unwrap();
        config.logging.set_default_level("warn");
        assert_eq!(config.logging.level(), "debug");

        let mut config = Config::default();
        assert_eq!(config.logging.level(), DEFAULT_LOG_LEVEL);
        config.logging.set_default_level("warn");
        assert_eq!(config.logging.level(), "warn");
    }

    #[test]
    fn test_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[backend]\nurl = \"http://ml.internal:9000\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.backend.url, "http://ml.internal:9000");
        assert_eq!(config.backend.request_timeout_secs, 30);
        assert_eq!(config.server.port, 8084);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[server\nport = ").unwrap();
        let err = Config::load(&bad).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ECOINSIGHT_PORT", "9100"),
            ("ECOINSIGHT_BACKEND_URL", "http://10.0.0.5:5000"),
            ("ECOINSIGHT_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.backend.url, "http://10.0.0.5:5000");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_invalid_port_override_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "ECOINSIGHT_PORT").then(|| "http".to_string()));
        assert_eq!(config.server.port, 8084);
    }
}
