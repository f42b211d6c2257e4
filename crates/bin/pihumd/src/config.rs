//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `pihum.toml` in the working directory, or the file named by
//! `PIHUM_CONFIG`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use pihum_adapter_iio::IioConfig;
use pihum_adapter_orvibo::OrviboConfig;
use pihum_adapter_virtual::VirtualConfig;
use pihum_domain::device::MacAddress;
use pihum_domain::threshold::ThresholdConfig;
use serde::Deserialize;

const DEFAULT_PATH: &str = "pihum.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which devices to talk to.
    pub backend: Backend,
    /// Humidity band.
    pub thresholds: ThresholdsConfig,
    /// Discovery settings.
    pub discovery: DiscoveryConfig,
    /// Sensor settings.
    pub sensor: SensorConfig,
    /// Orvibo network settings.
    pub orvibo: OrviboConfig,
    /// Socket to control from startup.
    pub socket: SocketConfig,
    /// Simulated devices, used by the `virtual` backend.
    #[serde(rename = "virtual")]
    pub simulation: VirtualConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Device backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Backend {
    /// Orvibo sockets and an IIO sensor.
    #[default]
    #[serde(rename = "orvibo+iio")]
    Hardware,
    /// Simulated devices.
    #[serde(rename = "virtual")]
    Virtual,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "orvibo+iio" => Ok(Self::Hardware),
            "virtual" => Ok(Self::Virtual),
            other => Err(ConfigError::Validation(format!(
                "unknown backend {other:?}, expected \"orvibo+iio\" or \"virtual\""
            ))),
        }
    }
}

/// Humidity thresholds, in percent.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ThresholdsConfig {
    pub low: u8,
    pub high: u8,
}

/// Discovery configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// How long each discovery run listens for replies, in seconds.
    pub timeout_secs: u64,
}

/// Humidity sensor configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Pause between failed reads, in milliseconds.
    pub retry_delay_ms: u64,
    /// IIO device directory of the sensor.
    pub device: PathBuf,
}

/// Preselected socket.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SocketConfig {
    /// MAC address of the socket to control.
    pub mac: Option<MacAddress>,
    /// Its network address, when known without discovery.
    pub address: Option<IpAddr>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `pihum.toml` (or `PIHUM_CONFIG`), then apply
    /// environment-variable overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("PIHUM_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = var("PIHUM_BACKEND") {
            self.backend = val.parse()?;
        }
        if let Some(val) = var("PIHUM_HUMIDITY_LOW") {
            self.thresholds.low = parse_var("PIHUM_HUMIDITY_LOW", &val)?;
        }
        if let Some(val) = var("PIHUM_HUMIDITY_HIGH") {
            self.thresholds.high = parse_var("PIHUM_HUMIDITY_HIGH", &val)?;
        }
        if let Some(val) = var("PIHUM_SOCKET_MAC") {
            self.socket.mac = Some(parse_var("PIHUM_SOCKET_MAC", &val)?);
        }
        if let Some(val) = var("PIHUM_SOCKET_ADDRESS") {
            self.socket.address = Some(parse_var("PIHUM_SOCKET_ADDRESS", &val)?);
        }
        if let Some(val) = var("PIHUM_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds()?;
        if self.discovery.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "discovery timeout must be non-zero".to_string(),
            ));
        }
        if self.socket.address.is_some() && self.socket.mac.is_none() {
            return Err(ConfigError::Validation(
                "socket address given without socket mac".to_string(),
            ));
        }
        Ok(())
    }

    /// The humidity band.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the thresholds are inverted
    /// or above 100%.
    pub fn thresholds(&self) -> Result<ThresholdConfig, ConfigError> {
        ThresholdConfig::new(self.thresholds.low, self.thresholds.high)
            .map_err(|err| ConfigError::Validation(err.to_string()))
    }

    #[must_use]
    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery.timeout_secs)
    }

    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.sensor.retry_delay_ms)
    }

    #[must_use]
    pub fn iio(&self) -> IioConfig {
        IioConfig {
            device: self.sensor.device.clone(),
        }
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Validation(format!("invalid value {value:?} for {key}")))
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        let defaults = ThresholdConfig::default();
        Self {
            low: defaults.low(),
            high: defaults.high(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self { timeout_secs: 5 }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            retry_delay_ms: 2000,
            device: IioConfig::default().device,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "pihumd=info,pihum_app=info,pihum_adapter_orvibo=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
