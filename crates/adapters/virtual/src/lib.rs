//! # pihum-adapter-virtual
//!
//! Simulated hardware for running and demonstrating pihum without a sensor
//! or smart sockets.
//!
//! ## Provided devices
//!
//! | Device | Port | Behaviour |
//! |--------|------|-----------|
//! | [`VirtualSensor`] | `HumiditySensor` | Reads the room; optional initial failures |
//! | [`VirtualSocket`] | `SocketController` | Records the commanded state |
//! | [`VirtualTransport`] | `Transport` | Configured sockets answer a broadcast after a delay |
//!
//! All three share one simulated room: humidity drifts up on every reading
//! while all sockets are off, and down while one is on.
//!
//! ## Dependency rule
//!
//! Depends on `pihum-app` (port traits) and `pihum-domain` only.

mod config;
mod devices;
mod error;
mod room;
mod transport;

pub use config::{VirtualConfig, VirtualSocketConfig};
pub use devices::{VirtualSensor, VirtualSocket};
pub use error::VirtualError;
pub use transport::VirtualTransport;

use std::sync::Arc;
use std::time::Duration;

use room::Room;

/// The three simulated devices, wired to the same room.
pub struct VirtualBackend {
    pub transport: VirtualTransport,
    pub sensor: VirtualSensor,
    pub socket: VirtualSocket,
}

impl VirtualBackend {
    #[must_use]
    pub fn new(config: &VirtualConfig) -> Self {
        let room = Arc::new(Room::new(config));
        Self {
            transport: VirtualTransport::new(
                Arc::clone(&room),
                Duration::from_millis(config.announce_delay_ms),
            ),
            sensor: VirtualSensor::new(Arc::clone(&room)),
            socket: VirtualSocket::new(room),
        }
    }
}

#[cfg(test)]
mod tests {
    use pihum_app::ports::{HumiditySensor, SocketController, Transport, TransportEvent};
    use pihum_domain::device::PowerState;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn should_share_room_between_devices() {
        let VirtualBackend {
            mut transport,
            mut sensor,
            socket,
        } = VirtualBackend::new(&VirtualConfig::default());

        transport.prepare().await.unwrap();
        transport.broadcast_discover().await.unwrap();
        let TransportEvent::DeviceFound(device) = transport.next_event().await.unwrap() else {
            panic!("expected the default socket");
        };
        assert_eq!(device.power, PowerState::Off);

        socket.set_power(&device, true).await.unwrap();
        assert_eq!(sensor.read_raw().await.unwrap().humidity, 65);
        assert_eq!(sensor.read_raw().await.unwrap().humidity, 60);
    }
}
