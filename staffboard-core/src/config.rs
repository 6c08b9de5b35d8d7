//! Configuration management for Staffboard
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (STAFFBOARD_*)
//! 3. Config file (~/.config/staffboard/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the API listens on
    pub bind: String,

    /// Per-request timeout enforced by the HTTP layer
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Review store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database (None uses the cache directory)
    pub path: Option<PathBuf>,

    /// Maximum number of pooled connections
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_connections: 5,
        }
    }
}

/// A generic placeholder review supplied through configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FallbackReviewConfig {
    pub id: String,
    pub customer_name: String,
    pub stars: u8,
    pub text: String,
}

/// Review selection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReviewsConfig {
    /// Whether generic placeholder reviews fill empty slots
    pub fallback_enabled: bool,

    /// Custom placeholder reviews; empty means the built-in pool
    pub fallback_reviews: Vec<FallbackReviewConfig>,
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self {
            fallback_enabled: true,
            fallback_reviews: Vec::new(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub reviews: ReviewsConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/staffboard/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("staffboard").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - STAFFBOARD_BIND: Listen address for the API
    /// - STAFFBOARD_DB_PATH: SQLite database path
    /// - STAFFBOARD_FALLBACK: Enable generic fallback reviews (true/false)
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(bind) = lookup("STAFFBOARD_BIND") {
            self.server.bind = bind;
        }

        if let Some(path) = lookup("STAFFBOARD_DB_PATH") {
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(flag) = lookup("STAFFBOARD_FALLBACK") {
            self.reviews.fallback_enabled = flag.trim().parse().map_err(|_| {
                Error::Config(format!("STAFFBOARD_FALLBACK must be true or false, got {flag:?}"))
            })?;
        }

        Ok(self)
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, bind: Option<String>, db_path: Option<PathBuf>) -> Self {
        if let Some(bind) = bind {
            self.server.bind = bind;
        }

        if let Some(path) = db_path {
            self.database.path = Some(path);
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(
        config_path: Option<&Path>,
        bind: Option<String>,
        db_path: Option<PathBuf>,
    ) -> Result<Self> {
        let base = match config_path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load()?,
        };

        Ok(base.with_env_overrides()?.with_cli_overrides(bind, db_path))
    }
}
