//! Application configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/eventdigest/config.toml` by default. Every section is optional.
//!
//! ```toml
//! [cache]
//! path = "/tmp/eventdigest-cache.json"
//!
//! [photos]
//! page_size = 25
//!
//! [digest]
//! range_days = 7
//!
//! [providers]
//! facebook_token_env = "EVENTDIGEST_FACEBOOK_TOKEN"
//! timeout = 30
//!
//! [[templates]]
//! name = "Weekly"
//! intro = "Coming up this week:"
//! ending = "See you there!"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use eventdigest_core::SummaryTemplate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::photos::DEFAULT_PAGE_SIZE;

/// Configuration for eventdigest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub cache: CacheSettings,
    pub photos: PhotoSettings,
    pub digest: DigestSettings,
    pub providers: ProviderSettings,

    /// Summary templates offered besides the empty one.
    pub templates: Vec<SummaryTemplate>,
}

/// Where cached state is kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Cache file. Defaults to `cache.json` in the data directory.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoSettings {
    /// Photos fetched per batch.
    pub page_size: usize,
}

impl Default for PhotoSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestSettings {
    /// Length of the digest window from now. Unset means the Thursday to
    /// Wednesday week.
    pub range_days: Option<u32>,
}

/// Provider credentials and HTTP settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Environment variable holding the Facebook access token.
    pub facebook_token_env: String,

    /// Environment variable holding the Google access token.
    pub google_token_env: String,

    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            facebook_token_env: "EVENTDIGEST_FACEBOOK_TOKEN".to_string(),
            google_token_env: "EVENTDIGEST_GOOGLE_TOKEN".to_string(),
            timeout: 30,
        }
    }
}

impl ProviderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl AppConfig {
    /// Loads configuration from the default path, or defaults if there is no
    /// file.
    pub fn load() -> AppResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| AppError::config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> AppResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AppError::config(format!("failed to serialize config: {}", e)))
    }

    /// Cache file to use.
    pub fn cache_path(&self) -> PathBuf {
        self.cache
            .path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join("cache.json"))
    }

    /// Templates to choose from, the empty template first.
    pub fn summary_templates(&self) -> Vec<SummaryTemplate> {
        SummaryTemplate::with_empty_first(&self.templates)
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("eventdigest")
    }

    /// Returns the default data directory path.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("eventdigest")
    }
}
