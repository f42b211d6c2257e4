//! Power commands for a single socket.

use std::net::{Ipv4Addr, SocketAddr};

use pihum_app::ports::SocketController;
use pihum_domain::device::Device;
use pihum_domain::error::SocketError;
use tokio::net::UdpSocket;

use crate::error::OrviboError;
use crate::packet::{self, PORT};

/// [`SocketController`] sending Orvibo `cl` + `dc` datagrams.
///
/// Fire-and-forget: the socket's acknowledgement is not awaited, so success
/// only means the datagrams left this host.
pub struct OrviboSocketController {
    port: u16,
}

impl OrviboSocketController {
    #[must_use]
    pub fn new() -> Self {
        Self { port: PORT }
    }

    /// Send to `port` instead of the standard Orvibo port.
    #[must_use]
    pub fn with_port(port: u16) -> Self {
        Self { port }
    }

    async fn send(&self, device: &Device, on: bool) -> Result<(), OrviboError> {
        if device.address.is_unspecified() {
            return Err(OrviboError::NoAddress(device.mac));
        }
        let target = SocketAddr::new(device.address, self.port);
        let socket = UdpSocket::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))).await?;
        socket.send_to(&packet::subscribe(device.mac), target).await?;
        socket.send_to(&packet::power(device.mac, on), target).await?;
        Ok(())
    }
}

impl Default for OrviboSocketController {
    fn default() -> Self {
        Self::new()
    }
}

impl SocketController for OrviboSocketController {
    #[tracing::instrument(skip(self, device), fields(mac = %device.mac, address = %device.address))]
    async fn set_power(&self, device: &Device, on: bool) -> Result<(), SocketError> {
        self.send(device, on).await?;
        tracing::debug!("power command sent");
        Ok(())
    }
}
