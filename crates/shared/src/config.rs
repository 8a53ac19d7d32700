//! Configuration management for the anime search & watchlist workspace.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    pub data: DataConfig,

    /// Local storage settings
    pub storage: StorageConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Search provider settings
    pub search: SearchConfig,

    /// Rendered page settings
    #[serde(default)]
    pub pages: PagesConfig,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root data directory path
    pub root_dir: String,
}

/// Local key-value storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store file path (relative to data directory or absolute)
    pub path: String,

    /// Origin the stored keys are scoped to
    pub origin: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Which remote search API to query
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Jikan REST API (query string)
    Jikan,
    /// AniList GraphQL API (single endpoint)
    Anilist,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Jikan => write!(f, "jikan"),
            ProviderKind::Anilist => write!(f, "anilist"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jikan" => Ok(ProviderKind::Jikan),
            "anilist" => Ok(ProviderKind::Anilist),
            _ => Err(anyhow::anyhow!("Invalid search provider: {}", s)),
        }
    }
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Provider used for searches
    pub provider: ProviderKind,

    /// Jikan API base URL
    pub jikan_base_url: String,

    /// AniList GraphQL endpoint
    pub anilist_url: String,

    /// Number of records requested per search
    pub page_size: u32,

    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,

    /// Rate limiting settings
    pub rate_limit: RateLimitConfig,

    /// Categories offered by the "pick a vibe" selector
    pub categories: Vec<String>,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per second
    pub requests_per_second: f64,

    /// Maximum requests per minute
    pub requests_per_minute: u32,
}

/// Rendered page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagesConfig {
    /// Output directory for rendered HTML pages (relative to data directory)
    pub output_dir: String,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            output_dir: "pages".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                root_dir: "data".to_string(),
            },
            storage: StorageConfig {
                path: "storage.db".to_string(),
                origin: "file://anime-watchlist".to_string(),
            },
            logging: LoggingConfig {
                log_dir: "logs".to_string(),
                default_level: "info".to_string(),
                console: true,
                file: true,
                json_format: false,
            },
            search: SearchConfig {
                provider: ProviderKind::Jikan,
                jikan_base_url: "https://api.jikan.moe/v4".to_string(),
                anilist_url: "https://graphql.anilist.co".to_string(),
                page_size: 24,
                timeout_seconds: 30,
                rate_limit: RateLimitConfig {
                    requests_per_second: 3.0,
                    requests_per_minute: 60,
                },
                categories: [
                    "Action",
                    "Adventure",
                    "Comedy",
                    "Drama",
                    "Fantasy",
                    "Horror",
                    "Mystery",
                    "Romance",
                    "Sci-Fi",
                    "Slice of Life",
                    "Sports",
                    "Supernatural",
                ]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            },
            pages: PagesConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Parse the configured log level, falling back to INFO
    pub fn log_level(&self) -> tracing::Level {
        self.logging
            .default_level
            .parse()
            .unwrap_or(tracing::Level::INFO)
    }

    /// Get the path for the data directory
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    /// Get the path for the local storage file
    pub fn storage_path(&self) -> PathBuf {
        self.resolve(&self.storage.path)
    }

    /// Get the path for the log directory
    pub fn log_dir(&self) -> PathBuf {
        self.resolve(&self.logging.log_dir)
    }

    /// Get the path for the rendered pages directory
    pub fn pages_dir(&self) -> PathBuf {
        self.resolve(&self.pages.output_dir)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir().join(path)
        }
    }
}
