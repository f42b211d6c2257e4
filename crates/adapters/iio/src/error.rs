//! IIO adapter error types.

use std::path::PathBuf;

use pihum_domain::error::SensorError;

/// Errors specific to the IIO adapter.
#[derive(Debug, thiserror::Error)]
pub enum IioError {
    /// Reading a sysfs attribute failed. The `dht11` driver answers `EIO`
    /// when the sensor's checksum does not match.
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The attribute did not hold an integer.
    #[error("unexpected value {value:?} in {}", path.display())]
    Parse { path: PathBuf, value: String },
}

impl From<IioError> for SensorError {
    fn from(err: IioError) -> Self {
        Self::Read(Box::new(err))
    }
}
