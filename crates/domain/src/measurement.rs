//! Measurement — one temperature/humidity snapshot from the sensor.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::ValidationError;

/// UTC timestamp attached to measurements.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// An immutable sensor reading. A new reading replaces the previous one; it
/// is never updated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    temperature: i32,
    humidity: u8,
    taken_at: Timestamp,
}

impl Measurement {
    /// Build a measurement from raw sensor values.
    ///
    /// `temperature` is in tenths of a degree Celsius (the native resolution
    /// of DHT22-class sensors), `humidity` in percent.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::HumidityOutOfRange`] when `humidity` is not
    /// within `0..=100`.
    pub fn new(temperature: i32, humidity: i32, taken_at: Timestamp) -> Result<Self, ValidationError> {
        let humidity = u8::try_from(humidity)
            .ok()
            .filter(|h| *h <= 100)
            .ok_or(ValidationError::HumidityOutOfRange(humidity))?;
        Ok(Self {
            temperature,
            humidity,
            taken_at,
        })
    }

    /// Temperature in tenths of a degree Celsius.
    #[must_use]
    pub fn temperature(&self) -> i32 {
        self.temperature
    }

    /// Relative humidity in percent (`0..=100`).
    #[must_use]
    pub fn humidity(&self) -> u8 {
        self.humidity
    }

    #[must_use]
    pub fn taken_at(&self) -> Timestamp {
        self.taken_at
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.temperature < 0 { "-" } else { "" };
        let abs = self.temperature.unsigned_abs();
        write!(
            f,
            "{sign}{}.{}\u{b0}C, {}% humidity at {}",
            abs / 10,
            abs % 10,
            self.humidity,
            self.taken_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at_noon() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn should_accept_humidity_bounds() {
        assert_eq!(Measurement::new(215, 0, at_noon()).unwrap().humidity(), 0);
        assert_eq!(Measurement::new(215, 100, at_noon()).unwrap().humidity(), 100);
    }

    #[test]
    fn should_reject_humidity_outside_range() {
        assert_eq!(
            Measurement::new(215, 101, at_noon()),
            Err(ValidationError::HumidityOutOfRange(101))
        );
        assert_eq!(
            Measurement::new(215, -3, at_noon()),
            Err(ValidationError::HumidityOutOfRange(-3))
        );
    }

    #[test]
    fn should_display_tenths_of_degree() {
        let m = Measurement::new(234, 45, at_noon()).unwrap();
        assert_eq!(m.to_string(), "23.4\u{b0}C, 45% humidity at 2024-05-01 12:00:00 UTC");
    }

    #[test]
    fn should_display_negative_temperature_below_one_degree() {
        let m = Measurement::new(-5, 80, at_noon()).unwrap();
        assert!(m.to_string().starts_with("-0.5\u{b0}C"));
    }

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        assert!(ts >= before);
        assert!(ts <= Utc::now());
    }
}
