//! YAML configuration for the SomaFM client
//!
//! Every key is optional; a missing file yields the defaults.
//!
//! ```yaml
//! api_url: https://api.somafm.com/channels.json
//! cache_ttl_secs: 60
//! sort_channels: true
//! streams:
//!   - quality: high
//!     format: aacp
//! ```

use crate::client::{DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::models::StreamPreference;
use crate::stateful_client::{ChannelOptions, CHANNELS_CACHE_KEY, DEFAULT_CACHE_TTL_SECS};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Name of the per-user directories and of the config file's parent
pub const APP_DIR_NAME: &str = "pmosomafm";

/// Environment variable selecting the test cache entry when set to `test`
pub const ENV_VAR: &str = "PMOSOMAFM_ENV";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SomaFmConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    #[serde(default = "default_cache_key")]
    pub cache_key: String,
    /// Where channel artwork is downloaded
    #[serde(default = "default_artwork_dir")]
    pub artwork_dir: PathBuf,
    #[serde(default)]
    pub sort_channels: bool,
    /// Merged position by position over the built-in stream preferences
    #[serde(default)]
    pub streams: Vec<StreamPreference>,
}

impl Default for SomaFmConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_dir: default_cache_dir(),
            cache_key: default_cache_key(),
            artwork_dir: default_artwork_dir(),
            sort_channels: false,
            streams: Vec::new(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

fn default_cache_key() -> String {
    match std::env::var(ENV_VAR) {
        Ok(env) if env == "test" => format!("{}-test", CHANNELS_CACHE_KEY),
        _ => CHANNELS_CACHE_KEY.to_string(),
    }
}

fn default_artwork_dir() -> PathBuf {
    std::env::temp_dir().join(APP_DIR_NAME)
}

impl SomaFmConfig {
    /// Load the user configuration, writing the defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            info!("Wrote default configuration to {}", config_path.display());
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// Load a configuration file; a missing file yields the defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    /// `{config dir}/pmosomafm/config.yaml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
            .join("config.yaml")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Channel options seeded from this configuration
    ///
    /// `streams` stays empty: configured preferences are applied by the
    /// client built with [`crate::SomaFmStatefulClient::from_config`].
    pub fn default_options(&self) -> ChannelOptions {
        ChannelOptions::new().sort_channels(self.sort_channels)
    }
}
