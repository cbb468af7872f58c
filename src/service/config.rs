use crate::aggregation::WindowConfig;
use crate::error::{Result, StatsError};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

/// Top-level service configuration, usually read from a TOML file:
///
/// ```toml
/// [http]
/// host = "0.0.0.0"
/// port = 8080
///
/// [window]
/// seconds = 60
/// bucket_millis = 1000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Window and bucket sizing
    #[serde(default)]
    pub window: WindowSettings,
}

/// HTTP transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
    /// Decimal places statistics are rounded to on the wire (0 keeps full precision)
    #[serde(default = "default_precision")]
    pub precision: u32,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Maximum request body size in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Window and bucket sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSettings {
    /// Trailing window length in seconds
    #[serde(default = "default_window_seconds")]
    pub seconds: u64,
    /// Bucket width in milliseconds
    #[serde(default = "default_bucket_millis")]
    pub bucket_millis: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            precision: default_precision(),
            request_timeout_secs: default_request_timeout_secs(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            seconds: default_window_seconds(),
            bucket_millis: default_bucket_millis(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_precision() -> u32 {
    3
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_max_body_bytes() -> usize {
    1024 * 1024
}
fn default_window_seconds() -> u64 {
    60
}
fn default_bucket_millis() -> u64 {
    1000
}

impl ServiceConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Read and parse a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Validated window configuration
    pub fn window_config(&self) -> Result<WindowConfig> {
        let config = WindowConfig::default()
            .with_window(Duration::from_secs(self.window.seconds))
            .with_granularity(Duration::from_millis(self.window.bucket_millis));
        config.validate()?;
        Ok(config)
    }
}

impl HttpConfig {
    /// Socket address to bind
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| StatsError::ConfigParse(format!("invalid host '{}': {}", self.host, e)))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Per-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
