//! Sensor service — turns single physical reads into validated measurements.

use std::time::Duration;

use pihum_domain::error::SensorError;
use pihum_domain::measurement::{self, Measurement};

use crate::ports::{HumiditySensor, SensorReader};

/// Physical reads attempted before a measurement is given up on.
pub const MAX_ATTEMPTS: u32 = 3;

/// [`SensorReader`] that retries a [`HumiditySensor`] up to [`MAX_ATTEMPTS`]
/// times, pausing between attempts.
///
/// A reading that fails validation (humidity outside `0..=100`) is a failed
/// attempt like any other: single-wire sensors occasionally deliver garbage
/// that still passes their checksum.
pub struct RetryingSensorReader<H> {
    sensor: H,
    retry_delay: Duration,
}

impl<H: HumiditySensor> RetryingSensorReader<H> {
    /// Create a new reader around `sensor`.
    pub fn new(sensor: H, retry_delay: Duration) -> Self {
        Self {
            sensor,
            retry_delay,
        }
    }

    async fn attempt(&mut self) -> Result<Measurement, SensorError> {
        let raw = self.sensor.read_raw().await?;
        Ok(Measurement::new(
            raw.temperature,
            raw.humidity,
            measurement::now(),
        )?)
    }
}

impl<H: HumiditySensor> SensorReader for RetryingSensorReader<H> {
    #[tracing::instrument(skip(self))]
    async fn read(&mut self) -> Result<Measurement, SensorError> {
        let mut attempt = 1;
        loop {
            match self.attempt().await {
                Ok(measurement) => {
                    tracing::debug!(retries = attempt - 1, %measurement, "sensor read");
                    return Ok(measurement);
                }
                Err(err) if attempt < MAX_ATTEMPTS => {
                    tracing::debug!(attempt, %err, "sensor read failed, retrying");
                    attempt += 1;
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(err) => {
                    return Err(SensorError::Exhausted {
                        attempts: attempt,
                        last: Box::new(err),
                    });
                }
            }
        }
    }
}
