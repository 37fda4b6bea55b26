use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "ISS_TRACKER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Service name; also the prefix of the rolling log files
pub const SERVICE_NAME: &str = "iss-tracker";

pub const NASA_OEM_URL: &str =
    "https://nasa-public-data.s3.amazonaws.com/iss-coords/current/ISS_OEM/ISS.OEM_J2K_EPH.xml";
pub const NOMINATIM_REVERSE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory for rolling log files
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Days a rolled log file is kept; 0 keeps them forever
    #[serde(default = "default_log_retention_days")]
    pub log_retention_days: u64,

    /// Periodic refresh; unset means refresh only at startup and on request
    #[serde(default)]
    pub refresh_interval_minutes: Option<u64>,

    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub geocoder: GeocoderConfig,
}

/// Where the OEM document comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_url")]
    pub url: String,

    /// Local OEM file; takes precedence over `url` when set
    #[serde(default)]
    pub file: Option<String>,

    #[serde(default = "default_source_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default = "default_geocoder_enabled")]
    pub enabled: bool,

    #[serde(default = "default_geocoder_url")]
    pub url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_geocoder_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_retention_days() -> u64 {
    3
}

fn default_enable_cors() -> bool {
    true
}

fn default_source_url() -> String {
    NASA_OEM_URL.to_string()
}

fn default_source_timeout() -> u64 {
    30
}

fn default_geocoder_enabled() -> bool {
    true
}

fn default_geocoder_url() -> String {
    NOMINATIM_REVERSE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("{}/{}", SERVICE_NAME, env!("CARGO_PKG_VERSION"))
}

fn default_geocoder_timeout() -> u64 {
    5
}

fn default_zoom() -> u8 {
    15
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            file: None,
            timeout_secs: default_source_timeout(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            enabled: default_geocoder_enabled(),
            url: default_geocoder_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_geocoder_timeout(),
            zoom: default_zoom(),
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            log_retention_days: default_log_retention_days(),
            refresh_interval_minutes: None,
            enable_cors: default_enable_cors(),
            source: SourceConfig::default(),
            geocoder: GeocoderConfig::default(),
        }
    }
}

impl TrackerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: TrackerConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        Ok(config)
    }

    /// Load from `$ISS_TRACKER_CONFIG` or `config.toml`; a missing file
    /// yields the defaults, a broken one is an error.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_or_default(path)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
