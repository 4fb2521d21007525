//! Configuration management for newsdesk.
//!
//! Configuration is read from `~/.config/newsdesk/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetcher::DEFAULT_PAGE_SIZE;

/// Environment variable that takes precedence over `api.api_key`.
pub const API_KEY_ENV: &str = "NEWS_API_KEY";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub feed: FeedConfig,
    pub connectivity: ConnectivityConfig,
    pub store: StoreConfig,
}

/// Remote news API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org".to_string(),
            api_key: None,
            timeout_secs: 10,
            user_agent: concat!("newsdesk/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Pagination and search behaviour.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Region passed to the headline listing (default: "us")
    pub country: String,
    /// Articles requested per page (default: 20)
    pub page_size: u32,
    /// Quiet interval before a typed search is sent, in milliseconds (default: 500)
    pub search_delay_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            country: "us".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            search_delay_ms: 500,
        }
    }
}

impl FeedConfig {
    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    /// Address used for the route lookup. Nothing is ever sent to it.
    pub probe_addr: String,
    /// Treat the network as unreachable without probing.
    pub offline: bool,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            probe_addr: "1.1.1.1:53".to_string(),
            offline: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file (default: `<data dir>/newsdesk/newsdesk.db`)
    pub db_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default().with_env_overrides());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config.with_env_overrides())
    }

    /// Get the default config file path: `~/.config/newsdesk/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("newsdesk").join("config.toml"))
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                self.api.api_key = Some(key);
            }
        }
        self
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# newsdesk configuration

[api]
base_url = "https://newsapi.org"

# API key for the news service. The NEWS_API_KEY environment variable
# takes precedence when set.
# api_key = ""

# Request timeout in seconds
timeout_secs = 10

[feed]
# Region used for the headline listing
country = "us"

# Articles requested per page
page_size = 20

# Wait this long after the last keystroke before searching (milliseconds)
search_delay_ms = 500

[connectivity]
# Reachability is decided by a local route lookup towards this address.
# No packet is sent.
probe_addr = "1.1.1.1:53"

# Never touch the network; every feed request reports no connection.
offline = false

[store]
# Saved articles database. Defaults to the platform data directory.
# db_path = "/home/me/.local/share/newsdesk/newsdesk.db"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
