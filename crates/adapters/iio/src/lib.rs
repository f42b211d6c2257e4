//! # pihum-adapter-iio
//!
//! Humidity sensor backed by the Linux industrial I/O subsystem.
//!
//! The kernel `dht11` driver (which also handles DHT22) exposes each reading
//! as sysfs attributes under `/sys/bus/iio/devices/iio:deviceN/`:
//!
//! | File | Unit |
//! |------|------|
//! | `in_temp_input` | millidegrees Celsius |
//! | `in_humidityrelative_input` | milli-percent |
//!
//! The driver performs the single-wire exchange on every read and answers
//! `EIO` when the checksum does not match; that surfaces as a failed read and
//! is retried by the application's sensor reader.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `pihum-app` and `pihum-domain`.

mod config;
mod error;

pub use config::IioConfig;
pub use error::IioError;

use std::path::{Path, PathBuf};

use pihum_app::ports::{HumiditySensor, RawReading};
use pihum_domain::error::SensorError;

const TEMPERATURE_FILE: &str = "in_temp_input";
const HUMIDITY_FILE: &str = "in_humidityrelative_input";

/// [`HumiditySensor`] reading an IIO device directory.
pub struct IioSensor {
    device: PathBuf,
}

impl IioSensor {
    #[must_use]
    pub fn new(config: IioConfig) -> Self {
        Self {
            device: config.device,
        }
    }

    async fn read_milli(&self, file: &str) -> Result<i32, IioError> {
        let path = self.device.join(file);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| IioError::Io {
                path: path.clone(),
                source,
            })?;
        parse_value(&path, &content)
    }
}

fn parse_value(path: &Path, content: &str) -> Result<i32, IioError> {
    content.trim().parse().map_err(|_| IioError::Parse {
        path: path.to_path_buf(),
        value: content.trim().to_string(),
    })
}

/// Round a thousandths value to `1 / divisor` units.
fn scale(milli: i32, divisor: i32) -> i32 {
    let rounded = (i64::from(milli) + i64::from(divisor / 2)).div_euclid(i64::from(divisor));
    i32::try_from(rounded).unwrap_or(if rounded < 0 { i32::MIN } else { i32::MAX })
}

impl HumiditySensor for IioSensor {
    async fn read_raw(&mut self) -> Result<RawReading, SensorError> {
        let temperature = self.read_milli(TEMPERATURE_FILE).await?;
        let humidity = self.read_milli(HUMIDITY_FILE).await?;
        tracing::trace!(temperature, humidity, "raw IIO values");
        Ok(RawReading {
            temperature: scale(temperature, 100),
            humidity: scale(humidity, 1000),
        })
    }
}
