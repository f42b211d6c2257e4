//! Transport port — the network channel used to find sockets.
//!
//! The discovery service drives a transport through one lifecycle per run:
//! [`prepare`](Transport::prepare), [`broadcast_discover`](Transport::broadcast_discover),
//! repeated [`next_event`](Transport::next_event) from a background task, then
//! [`close`](Transport::close). A closed transport must accept `prepare` again.

use std::future::Future;

use pihum_domain::device::Device;
use pihum_domain::error::TransportError;

/// A decoded message received on the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A socket answered the discovery broadcast.
    DeviceFound(Device),
    /// Any other protocol message; ignored by discovery.
    Other { kind: String },
}

pub trait Transport: Send {
    /// Open the underlying channel.
    fn prepare(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Ask every socket on the network to announce itself.
    fn broadcast_discover(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Wait for the next message and decode it.
    ///
    /// Must wait without spinning and must be cancel-safe: the listener races
    /// it against a stop signal, and dropping the future must not lose a
    /// message that was already decoded.
    ///
    /// A [`TransportError::Decode`] concerns a single message; any other
    /// error ends the listener.
    fn next_event(&mut self) -> impl Future<Output = Result<TransportEvent, TransportError>> + Send;

    /// Release the underlying channel. Idempotent.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}
