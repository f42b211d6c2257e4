//! Virtual adapter error types.

use pihum_domain::device::MacAddress;
use pihum_domain::error::{SensorError, SocketError, TransportError};

/// Errors raised by the simulated devices.
#[derive(Debug, thiserror::Error)]
pub enum VirtualError {
    /// The transport was used before `prepare` or after `close`.
    #[error("virtual transport not open")]
    NotOpen,

    /// A configured sensor failure.
    #[error("simulated sensor glitch")]
    SensorGlitch,

    /// No simulated socket has this MAC.
    #[error("no virtual socket with MAC {0}")]
    UnknownSocket(MacAddress),
}

impl From<VirtualError> for TransportError {
    fn from(err: VirtualError) -> Self {
        match err {
            VirtualError::NotOpen => Self::NotOpen,
            other => Self::Io(Box::new(other)),
        }
    }
}

impl From<VirtualError> for SensorError {
    fn from(err: VirtualError) -> Self {
        Self::Read(Box::new(err))
    }
}

impl From<VirtualError> for SocketError {
    fn from(err: VirtualError) -> Self {
        Self::Send(Box::new(err))
    }
}
