//! Bootstrap configuration loading and data folder resolution
//!
//! The bootstrap TOML file only carries what is needed before the player
//! configuration can be fetched: where the config endpoint lives, where the
//! saved state is kept, timing knobs and logging. Everything about the player
//! itself (server, port, rooms, TTS) comes from the remote `/sonos` endpoint
//! unless a fixed `[player]` section is present.
//!
//! A missing or unreadable TOML file never stops startup: a warning is logged
//! and built-in defaults are used.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SKC_CONFIG";

/// Environment variable overriding the data folder
pub const DATA_FOLDER_ENV_VAR: &str = "SKC_DATA_FOLDER";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// Base URL of the API serving `/sonos` (the player configuration)
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Folder holding the saved playback state
    #[serde(default)]
    pub data_folder: Option<PathBuf>,

    /// Timeout applied to every HTTP request
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Delay between clearing the queue and starting playback
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Saved positions older than this are evicted on the next write
    #[serde(default = "default_bookmark_retention_days")]
    pub bookmark_retention_days: u32,

    /// Fixed player address, skips the remote configuration fetch
    #[serde(default)]
    pub player: Option<PlayerSection>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Fixed player address from the `[player]` section
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlayerSection {
    pub server: String,
    pub port: u16,
    pub rooms: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            data_folder: None,
            request_timeout_ms: default_request_timeout_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            bookmark_retention_days: default_bookmark_retention_days(),
            player: None,
            logging: LoggingConfig::default(),
        }
    }
}

fn default_api_base() -> String {
    "http://localhost:8200/api".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_settle_delay_ms() -> u64 {
    1000
}

fn default_bookmark_retention_days() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Read and parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Load bootstrap configuration, degrading to defaults
    ///
    /// Lookup order:
    /// 1. Explicit path (command-line argument)
    /// 2. `SKC_CONFIG` environment variable
    /// 3. Platform config file (`~/.config/skc/config.toml`, `/etc/skc/config.toml`)
    /// 4. Built-in defaults
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let candidate = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from))
            .or_else(|| find_config_file().ok());

        let Some(path) = candidate else {
            info!("No config file found, using built-in defaults");
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(config) => {
                info!("Loaded TOML configuration from {:?}", path);
                config
            }
            Err(e) => {
                warn!("{}; using built-in defaults", e);
                Self::default()
            }
        }
    }
}

/// Locate the platform config file
fn find_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("skc").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(unix) {
        let system_config = PathBuf::from("/etc/skc/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Data folder resolution
///
/// Priority order:
/// 1. Command-line argument (highest priority)
/// 2. `SKC_DATA_FOLDER` environment variable
/// 3. TOML `data_folder`
/// 4. OS-dependent default (fallback)
pub struct DataFolderResolver<'a> {
    cli_arg: Option<&'a Path>,
    toml_value: Option<&'a Path>,
}

impl<'a> DataFolderResolver<'a> {
    pub fn new(cli_arg: Option<&'a Path>, toml_value: Option<&'a Path>) -> Self {
        Self { cli_arg, toml_value }
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = self.cli_arg {
            return path.to_path_buf();
        }

        if let Ok(path) = std::env::var(DATA_FOLDER_ENV_VAR) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = self.toml_value {
            return path.to_path_buf();
        }

        get_default_data_folder()
    }
}

/// Get OS-dependent default data folder path
pub fn get_default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("skc"))
        .unwrap_or_else(|| PathBuf::from("./skc_data"))
}
