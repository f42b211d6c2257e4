//! Sensor ports — the physical read primitive and the retrying reader built
//! on top of it.

use std::future::Future;

use pihum_domain::error::SensorError;
use pihum_domain::measurement::Measurement;

/// Raw values of one successful physical read, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawReading {
    /// Tenths of a degree Celsius.
    pub temperature: i32,
    /// Percent relative humidity; may be out of range on a glitchy read.
    pub humidity: i32,
}

/// One physical read of a temperature/humidity sensor.
///
/// Implementations make exactly one attempt per call; retrying is the
/// caller's business.
pub trait HumiditySensor: Send {
    fn read_raw(&mut self) -> impl Future<Output = Result<RawReading, SensorError>> + Send;
}

/// A validated measurement, or a terminal failure once the retry budget is
/// spent.
pub trait SensorReader {
    fn read(&mut self) -> impl Future<Output = Result<Measurement, SensorError>> + Send;
}
