//! Orvibo adapter error types.

use pihum_domain::device::MacAddress;
use pihum_domain::error::{SocketError, TransportError};

/// Errors specific to the Orvibo adapter.
#[derive(Debug, thiserror::Error)]
pub enum OrviboError {
    /// The UDP socket has not been bound yet.
    #[error("Orvibo transport not open")]
    NotOpen,

    /// The socket to switch has never been located on the network.
    #[error("no network address known for socket {0}")]
    NoAddress(MacAddress),

    /// A UDP operation failed.
    #[error("Orvibo UDP error")]
    Io(#[from] std::io::Error),

    /// A datagram could not be decoded.
    #[error("failed to decode Orvibo packet")]
    Packet(#[from] PacketError),
}

/// Details about why a datagram is not a valid Orvibo packet.
#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    #[error("datagram of {actual} bytes is shorter than the header")]
    TooShort { actual: usize },

    #[error("bad magic {0:02X?}")]
    BadMagic([u8; 2]),

    #[error("header declares {declared} bytes, datagram has {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("{command} packet must be {expected} bytes, got {actual}")]
    WrongLength {
        command: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl From<OrviboError> for TransportError {
    fn from(err: OrviboError) -> Self {
        match err {
            OrviboError::NotOpen => Self::NotOpen,
            err @ OrviboError::Packet(_) => Self::Decode(Box::new(err)),
            other => Self::Io(Box::new(other)),
        }
    }
}

impl From<OrviboError> for SocketError {
    fn from(err: OrviboError) -> Self {
        Self::Send(Box::new(err))
    }
}
