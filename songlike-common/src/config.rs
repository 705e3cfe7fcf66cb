//! TOML bootstrap configuration and config file discovery
//!
//! The TOML file is the lowest-priority explicit source. Resolution order
//! used by the service is:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (including values loaded from `.env`)
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not an error: the service starts with defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Production base URL of the link-aggregation API
pub const DEFAULT_ODESLI_URL: &str = "https://api.song.link/v1-alpha.1";
/// Production base URL of the audio recognition API
pub const DEFAULT_AUDD_URL: &str = "https://api.audd.io";
/// Production base URL of the playlist API
pub const DEFAULT_SPOTIFY_URL: &str = "https://api.spotify.com/v1";

/// Bootstrap configuration loaded from TOML
///
/// Every field is optional so partial files are valid; unset values fall
/// through to compiled defaults during resolution.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TomlConfig {
    /// HTTP listen port
    #[serde(default)]
    pub port: Option<u16>,

    /// HTTP bind host
    #[serde(default)]
    pub host: Option<String>,

    /// API key for the link-aggregation lookup
    #[serde(default)]
    pub odesli_api_key: Option<String>,

    /// API token for audio recognition
    #[serde(default)]
    pub audd_api_token: Option<String>,

    /// Path to the `ffmpeg` executable
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    /// Path to the `yt-dlp` executable
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,

    /// Upper bound on the video download step, in seconds
    #[serde(default)]
    pub download_timeout_secs: Option<u64>,

    /// Length of the audio clip submitted for recognition, in seconds
    #[serde(default)]
    pub clip_seconds: Option<u32>,

    /// Parent directory for per-request scratch folders
    #[serde(default)]
    pub work_dir: Option<PathBuf>,

    /// External service base URLs
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// External service base URLs (overridable for staging or tests)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_odesli_url")]
    pub odesli: String,
    #[serde(default = "default_audd_url")]
    pub audd: String,
    #[serde(default = "default_spotify_url")]
    pub spotify: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            odesli: default_odesli_url(),
            audd: default_audd_url(),
            spotify: default_spotify_url(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
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

fn default_odesli_url() -> String {
    DEFAULT_ODESLI_URL.to_string()
}

fn default_audd_url() -> String {
    DEFAULT_AUDD_URL.to_string()
}

fn default_spotify_url() -> String {
    DEFAULT_SPOTIFY_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default configuration file path for the platform
///
/// `~/.config/songlike/config.toml` on Linux, the equivalent per-user config
/// directory elsewhere. Returns `None` when the platform has no such directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("songlike").join("config.toml"))
}

/// Parse TOML configuration from a string
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Load TOML configuration from `path`
///
/// A missing file yields defaults. An unreadable or malformed file is a
/// configuration error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    parse_toml_config(&content)
}

/// Validate a secret value (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
