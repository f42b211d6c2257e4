//! IIO sensor configuration.

use std::path::PathBuf;

use serde::Deserialize;

/// Location of the sensor in sysfs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IioConfig {
    /// IIO device directory of the `dht11` driver instance.
    pub device: PathBuf,
}

impl Default for IioConfig {
    fn default() -> Self {
        Self {
            device: PathBuf::from("/sys/bus/iio/devices/iio:device0"),
        }
    }
}
