//! Configuration module for vidshelf.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, VidshelfError};

/// Environment variable overriding `database.url`.
pub const ENV_DATABASE_URL: &str = "VIDSHELF_DATABASE_URL";
/// Environment variable overriding `uploads.root`.
pub const ENV_UPLOAD_ROOT: &str = "VIDSHELF_UPLOAD_ROOT";
/// Environment variable overriding `server.port`.
pub const ENV_PORT: &str = "VIDSHELF_PORT";

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum upload request size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_upload_size() -> u64 {
    1024
}

impl ServerConfig {
    /// Maximum upload request size in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        (self.max_upload_size_mb as usize).saturating_mul(1024 * 1024)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Metadata database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL (e.g. `sqlite:data/vidshelf.db`, `postgres://...`).
    #[serde(default = "default_db_url")]
    pub url: String,
}

fn default_db_url() -> String {
    "sqlite:data/vidshelf.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
        }
    }
}

/// Upload storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    /// Directory holding uploaded files.
    #[serde(default = "default_upload_root")]
    pub root: String,
}

fn default_upload_root() -> String {
    "uploads".to_string()
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            root: default_upload_root(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/vidshelf.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Metadata database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Upload storage configuration.
    #[serde(default)]
    pub uploads: UploadsConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(VidshelfError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| VidshelfError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `VIDSHELF_DATABASE_URL`: metadata database URL
    /// - `VIDSHELF_UPLOAD_ROOT`: upload root directory
    /// - `VIDSHELF_PORT`: listening port
    ///
    /// Empty values are ignored.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.database.url = url;
        }
        if let Some(root) = lookup(ENV_UPLOAD_ROOT) {
            self.uploads.root = root;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .parse()
                .map_err(|_| VidshelfError::Config(format!("{ENV_PORT} is not a port: {port}")))?;
        }
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.uploads.root.trim().is_empty() {
            return Err(VidshelfError::Config("uploads.root must not be empty".to_string()));
        }
        if self.database.url.trim().is_empty() {
            return Err(VidshelfError::Config("database.url must not be empty".to_string()));
        }
        if self.server.max_upload_size_mb == 0 {
            return Err(VidshelfError::Config(
                "server.max_upload_size_mb must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
