//! UDP discovery transport.

use pihum_app::ports::{Transport, TransportEvent};
use pihum_domain::device::Device;
use pihum_domain::error::TransportError;
use tokio::net::UdpSocket;

use crate::config::OrviboConfig;
use crate::error::OrviboError;
use crate::packet::{self, Packet};

/// Largest datagram an S20 sends is 42 bytes.
const RECV_BUFFER: usize = 128;

/// [`Transport`] speaking the Orvibo S20 discovery protocol over UDP.
pub struct OrviboTransport {
    config: OrviboConfig,
    socket: Option<UdpSocket>,
}

impl OrviboTransport {
    #[must_use]
    pub fn new(config: OrviboConfig) -> Self {
        Self {
            config,
            socket: None,
        }
    }

    fn socket(&self) -> Result<&UdpSocket, OrviboError> {
        self.socket.as_ref().ok_or(OrviboError::NotOpen)
    }

    async fn bind(&self) -> Result<UdpSocket, OrviboError> {
        let socket = UdpSocket::bind(self.config.bind).await?;
        socket.set_broadcast(true)?;
        Ok(socket)
    }
}

impl Transport for OrviboTransport {
    async fn prepare(&mut self) -> Result<(), TransportError> {
        if self.socket.is_some() {
            return Ok(());
        }
        let socket = self
            .bind()
            .await
            .map_err(|err| TransportError::Prepare(Box::new(err)))?;
        tracing::debug!(bind = %self.config.bind, "orvibo transport open");
        self.socket = Some(socket);
        Ok(())
    }

    async fn broadcast_discover(&mut self) -> Result<(), TransportError> {
        let socket = self.socket()?;
        socket
            .send_to(&packet::discover(), self.config.broadcast)
            .await
            .map_err(OrviboError::from)?;
        tracing::debug!(broadcast = %self.config.broadcast, "discovery broadcast sent");
        Ok(())
    }

    async fn next_event(&mut self) -> Result<TransportEvent, TransportError> {
        let socket = self.socket()?;
        let mut buf = [0u8; RECV_BUFFER];
        let (len, from) = socket.recv_from(&mut buf).await.map_err(OrviboError::from)?;

        let event = match packet::decode(&buf[..len]).map_err(OrviboError::from)? {
            Packet::DiscoverReply { mac, power } => TransportEvent::DeviceFound(Device {
                mac,
                address: from.ip(),
                name: None,
                power,
            }),
            other => TransportEvent::Other {
                kind: other.command().to_string(),
            },
        };
        Ok(event)
    }

    async fn close(&mut self) {
        if self.socket.take().is_some() {
            tracing::debug!("orvibo transport closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, SocketAddr};

    use pihum_domain::device::PowerState;

    use super::*;
    use crate::packet::tests::{MAC, discover_reply};

    fn loopback() -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, 0))
    }

    async fn fake_socket() -> UdpSocket {
        UdpSocket::bind(loopback()).await.unwrap()
    }

    #[tokio::test]
    async fn should_require_prepare_before_broadcast() {
        let mut transport = OrviboTransport::new(OrviboConfig::default());
        let err = transport.broadcast_discover().await.unwrap_err();
        assert!(matches!(err, TransportError::NotOpen));
    }

    #[tokio::test]
    async fn should_discover_socket_over_udp() {
        let device = fake_socket().await;
        let mut transport = OrviboTransport::new(OrviboConfig {
            bind: loopback(),
            broadcast: device.local_addr().unwrap(),
        });

        transport.prepare().await.unwrap();
        transport.broadcast_discover().await.unwrap();

        let mut buf = [0u8; 64];
        let (len, hub) = device.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], packet::discover().as_slice());
        device.send_to(&discover_reply(MAC, 0x00), hub).await.unwrap();

        let event = transport.next_event().await.unwrap();
        let TransportEvent::DeviceFound(found) = event else {
            panic!("expected a device, got {event:?}");
        };
        assert_eq!(found.mac, MAC);
        assert_eq!(found.address, Ipv4Addr::LOCALHOST);
        assert_eq!(found.power, PowerState::Off);

        transport.close().await;
    }

    #[tokio::test]
    async fn should_report_garbage_as_decode_error() {
        let mut transport = OrviboTransport::new(OrviboConfig {
            bind: loopback(),
            broadcast: loopback(),
        });
        transport.prepare().await.unwrap();
        let hub = transport.socket().unwrap().local_addr().unwrap();

        let sender = fake_socket().await;
        sender.send_to(b"garbage!", hub).await.unwrap();
        sender.send_to(b"hd\x00\x08zz\x00\x00", hub).await.unwrap();

        assert!(matches!(
            transport.next_event().await,
            Err(TransportError::Decode(_))
        ));
        assert_eq!(
            transport.next_event().await.unwrap(),
            TransportEvent::Other {
                kind: "zz".to_string()
            }
        );
    }

    #[tokio::test]
    async fn should_reopen_after_close() {
        let mut transport = OrviboTransport::new(OrviboConfig {
            bind: loopback(),
            broadcast: loopback(),
        });
        transport.prepare().await.unwrap();
        transport.close().await;
        transport.close().await;
        assert!(transport.socket.is_none());

        transport.prepare().await.unwrap();
        assert!(transport.socket.is_some());
    }

    #[tokio::test]
    async fn should_fail_prepare_when_address_is_taken() {
        let taken = fake_socket().await;
        let mut transport = OrviboTransport::new(OrviboConfig {
            bind: taken.local_addr().unwrap(),
            broadcast: loopback(),
        });
        assert!(matches!(
            transport.prepare().await,
            Err(TransportError::Prepare(_))
        ));
    }
}
