//! Service configuration resolution
//!
//! Each setting resolves with priority CLI → ENV → TOML → compiled default.
//! `.env` is loaded into the process environment before resolution, so its
//! values count as ENV.

use songlike_common::config::{is_valid_key, EndpointsConfig, TomlConfig};
use songlike_common::{Error, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

pub const ENV_ODESLI_API_KEY: &str = "ODESLI_API_KEY";
pub const ENV_AUDD_API_TOKEN: &str = "AUDDIO_API_KEY";
pub const ENV_FFMPEG_PATH: &str = "FFMPEG_PATH";
pub const ENV_YTDLP_PATH: &str = "YTDLP_PATH";
pub const ENV_DOWNLOAD_TIMEOUT: &str = "SONGLIKE_DOWNLOAD_TIMEOUT_SECS";
pub const ENV_CLIP_SECONDS: &str = "SONGLIKE_CLIP_SECONDS";
pub const ENV_WORK_DIR: &str = "SONGLIKE_WORK_DIR";

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CLIP_SECONDS: u32 = 24;

/// Outcome of loading a `.env` file into the process environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFileStatus {
    Loaded,
    /// No file at the path; not an error
    Missing,
    /// File exists but could not be read or parsed
    Invalid(String),
}

/// Load `path` into the process environment (existing variables win)
///
/// Runs before logging is initialized, so the caller reports the outcome.
pub fn load_env_file(path: &Path) -> EnvFileStatus {
    match dotenvy::from_path(path) {
        Ok(()) => EnvFileStatus::Loaded,
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            EnvFileStatus::Missing
        }
        Err(e) => EnvFileStatus::Invalid(e.to_string()),
    }
}

/// Values supplied on the command line (or their clap-bound env vars)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Fully resolved service configuration
#[derive(Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub odesli_api_key: Option<String>,
    pub audd_api_token: Option<String>,
    pub ffmpeg_path: PathBuf,
    pub ytdlp_path: PathBuf,
    pub download_timeout: Duration,
    pub clip_length: Duration,
    pub work_dir: PathBuf,
    pub endpoints: EndpointsConfig,
}

// Keys are redacted.
impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("odesli_api_key", &self.odesli_api_key.as_ref().map(|_| "<set>"))
            .field("audd_api_token", &self.audd_api_token.as_ref().map(|_| "<set>"))
            .field("ffmpeg_path", &self.ffmpeg_path)
            .field("ytdlp_path", &self.ytdlp_path)
            .field("download_timeout", &self.download_timeout)
            .field("clip_length", &self.clip_length)
            .field("work_dir", &self.work_dir)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl ServiceConfig {
    /// Resolve every setting from CLI overrides, environment and TOML
    pub fn resolve(cli: &CliOverrides, toml: &TomlConfig) -> Result<Self> {
        let host = cli
            .host
            .clone()
            .or_else(|| toml.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = cli.port.or(toml.port).unwrap_or(DEFAULT_PORT);

        let odesli_api_key = resolve_secret(
            "Odesli API key",
            ENV_ODESLI_API_KEY,
            toml.odesli_api_key.as_deref(),
        );
        let audd_api_token = resolve_secret(
            "AudD API token",
            ENV_AUDD_API_TOKEN,
            toml.audd_api_token.as_deref(),
        );
        if audd_api_token.is_none() {
            warn!(
                "AudD API token not configured; audio recognition fallback is disabled. \
                 Set {} or audd_api_token in the config file.",
                ENV_AUDD_API_TOKEN
            );
        }

        let ffmpeg_path = env_value(ENV_FFMPEG_PATH)
            .map(PathBuf::from)
            .or_else(|| toml.ffmpeg_path.clone())
            .unwrap_or_else(|| PathBuf::from("ffmpeg"));

        let ytdlp_path = env_value(ENV_YTDLP_PATH)
            .map(PathBuf::from)
            .or_else(|| toml.ytdlp_path.clone())
            .unwrap_or_else(|| PathBuf::from("yt-dlp"));

        let timeout_secs = parse_env::<u64>(ENV_DOWNLOAD_TIMEOUT)?
            .or(toml.download_timeout_secs)
            .unwrap_or(DEFAULT_DOWNLOAD_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(Error::Config("download timeout must be at least 1 second".to_string()));
        }

        let clip_seconds = parse_env::<u32>(ENV_CLIP_SECONDS)?
            .or(toml.clip_seconds)
            .unwrap_or(DEFAULT_CLIP_SECONDS);
        if clip_seconds == 0 {
            return Err(Error::Config("clip length must be at least 1 second".to_string()));
        }

        let work_dir = env_value(ENV_WORK_DIR)
            .map(PathBuf::from)
            .or_else(|| toml.work_dir.clone())
            .unwrap_or_else(std::env::temp_dir);

        Ok(Self {
            host,
            port,
            odesli_api_key,
            audd_api_token,
            ffmpeg_path,
            ytdlp_path,
            download_timeout: Duration::from_secs(timeout_secs),
            clip_length: Duration::from_secs(u64::from(clip_seconds)),
            work_dir,
            endpoints: toml.endpoints.clone(),
        })
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Non-empty environment variable value
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_value(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::Config(format!("{}={:?} is invalid: {}", name, raw, e))),
        None => Ok(None),
    }
}

/// ENV → TOML resolution for a secret, logging which source won
fn resolve_secret(label: &str, env_name: &str, toml_value: Option<&str>) -> Option<String> {
    let env_key = std::env::var(env_name).ok().filter(|k| is_valid_key(k));
    let toml_key = toml_value.filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "{} found in both environment and TOML config. Using environment (higher priority).",
            label
        );
    }

    if let Some(key) = env_key {
        info!("{} loaded from environment variable", label);
        return Some(key);
    }

    if let Some(key) = toml_key {
        info!("{} loaded from TOML config", label);
        return Some(key.to_string());
    }

    None
}
