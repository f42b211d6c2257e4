//! Error types shared across the workspace.
//!
//! Each port has its own typed error. Adapters keep their protocol-specific
//! errors private and convert them into these via `From`, boxing the adapter
//! error as the `#[source]`.

/// Boxed adapter-specific cause carried by the port errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A domain invariant was violated while constructing a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("humidity low threshold {low}% must be below high threshold {high}%")]
    InvertedThresholds { low: u8, high: u8 },

    #[error("humidity {0}% is outside 0..=100")]
    HumidityOutOfRange(i32),

    #[error("invalid MAC address {0:?}")]
    InvalidMac(String),
}

/// Failures of the discovery transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An operation needed an open transport but it was never prepared
    /// (or was already closed).
    #[error("transport is not open")]
    NotOpen,

    /// Opening the transport failed.
    #[error("failed to prepare transport")]
    Prepare(#[source] BoxError),

    /// Sending or receiving failed.
    #[error("transport I/O error")]
    Io(#[source] BoxError),

    /// A single message could not be decoded. Never fatal to a discovery run.
    #[error("failed to decode message")]
    Decode(#[source] BoxError),
}

/// Failures of the humidity sensor.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    /// One physical read failed.
    #[error("sensor read failed")]
    Read(#[source] BoxError),

    /// The sensor answered with a value outside the physical range.
    #[error("invalid sensor reading")]
    Invalid(#[from] ValidationError),

    /// Every attempt of the retry budget failed.
    #[error("sensor read failed after {attempts} attempts")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<SensorError>,
    },
}

/// Failures of the socket power command.
#[derive(Debug, thiserror::Error)]
pub enum SocketError {
    /// The command could not be sent.
    #[error("failed to send power command")]
    Send(#[source] BoxError),
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn should_display_inverted_thresholds() {
        let err = ValidationError::InvertedThresholds { low: 60, high: 35 };
        assert_eq!(
            err.to_string(),
            "humidity low threshold 60% must be below high threshold 35%"
        );
    }

    #[test]
    fn should_display_exhausted_sensor_with_source() {
        let err = SensorError::Exhausted {
            attempts: 3,
            last: Box::new(SensorError::Invalid(ValidationError::HumidityOutOfRange(
                120,
            ))),
        };
        assert_eq!(err.to_string(), "sensor read failed after 3 attempts");
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "invalid sensor reading");
    }

    #[test]
    fn should_wrap_validation_error_into_sensor_error() {
        let err: SensorError = ValidationError::HumidityOutOfRange(-1).into();
        assert!(matches!(
            err,
            SensorError::Invalid(ValidationError::HumidityOutOfRange(-1))
        ));
    }

    #[test]
    fn should_keep_boxed_transport_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port 10000 busy");
        let err = TransportError::Prepare(Box::new(io));
        assert_eq!(err.to_string(), "failed to prepare transport");
        assert_eq!(err.source().unwrap().to_string(), "port 10000 busy");
    }
}
