//! Configuration structures and loading logic.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::download::RetryPolicy;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Browser session reuse configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Value of the `FANBOXSESSID` cookie copied from a logged-in browser.
    #[serde(default)]
    pub session_id: Option<String>,

    /// Browser user agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Archive options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Base directory for archives. Each creator gets a subdirectory.
    #[serde(default)]
    pub download_directory: Option<PathBuf>,

    /// Seconds to wait after every post detail fetched from the API.
    #[serde(default = "default_cooldown")]
    pub cooldown_seconds: u64,

    /// Maximum number of posts requested from the creator listing.
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,

    /// Give up on an asset after this many attempts. Unset retries forever.
    #[serde(default)]
    pub asset_max_attempts: Option<u32>,

    /// Milliseconds to wait between asset download attempts.
    #[serde(default)]
    pub asset_retry_delay_ms: u64,

    /// Whether to show a progress bar over the post listing.
    #[serde(default = "default_true")]
    pub show_progress: bool,

    /// Whether to log assets and posts skipped because they are already archived.
    #[serde(default)]
    pub show_skipped: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            download_directory: None,
            cooldown_seconds: default_cooldown(),
            list_limit: default_list_limit(),
            asset_max_attempts: None,
            asset_retry_delay_ms: 0,
            show_progress: true,
            show_skipped: false,
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/88.0.4324.150 Safari/537.36 Edg/88.0.705.63".to_string()
}

fn default_true() -> bool {
    true
}

fn default_cooldown() -> u64 {
    3
}

fn default_list_limit() -> u32 {
    300
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the effective archive root. Defaults to `./data`.
    pub fn download_directory(&self) -> PathBuf {
        self.options
            .download_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("data"))
    }

    /// Cooldown applied after each remote post detail fetch.
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.options.cooldown_seconds)
    }

    /// Retry policy for asset downloads.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.options.asset_max_attempts,
            delay: Duration::from_millis(self.options.asset_retry_delay_ms),
        }
    }
}
